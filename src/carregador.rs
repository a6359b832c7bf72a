use serde::Deserialize;
use std::{
    collections::BTreeSet,
    fs,
    io::Read,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    PainelError, PainelResult, RE_ANO, RE_NUMERO_DECIMAL, canonizar_tipo_energia,
    normalizar_tipo_energia,
};

/// Colunas obrigatórias do arquivo de dados em formato longo.
pub const COLUNAS_ESSENCIAIS: [&str; 4] = ["Estado", "Year", "tipo_energia", "geracao"];

/// Uma observação (estado, ano, tipo de energia, geração) já normalizada.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistroGeracao {
    pub estado: String,
    /// `None` quando o ano não pôde ser interpretado; o registro não entra na distribuição.
    pub ano: Option<i32>,
    pub tipo_energia: String,
    /// `None` quando o valor não pôde ser interpretado; conta como zero na distribuição.
    pub geracao: Option<f64>,
}

// Linha tal como aparece no arquivo; as demais colunas são ignoradas.
#[derive(Debug, Deserialize)]
struct LinhaBruta {
    #[serde(rename = "Estado")]
    estado: String,
    #[serde(rename = "Year")]
    ano: String,
    tipo_energia: String,
    geracao: String,
}

impl From<LinhaBruta> for RegistroGeracao {
    fn from(linha: LinhaBruta) -> Self {
        RegistroGeracao {
            ano: parse_ano(&linha.ano),
            geracao: parse_geracao(&linha.geracao),
            tipo_energia: normalizar_tipo_energia(&linha.tipo_energia),
            estado: linha.estado,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EstatisticasDeCarga {
    pub linhas: usize,
    pub anos_invalidos: usize,
    pub valores_invalidos: usize,
    pub rotulos_nao_mapeados: BTreeSet<String>,
}

#[derive(Debug)]
pub struct DadosCarregados {
    pub arquivo: PathBuf,
    pub registros: Vec<RegistroGeracao>,
    pub estatisticas: EstatisticasDeCarga,
    /// BLAKE3 do conteúdo do arquivo lido.
    pub impressao_digital: blake3::Hash,
}

/// Remove os separadores de milhar e interpreta o valor como decimal.
///
/// Valores negativos são tratados como inválidos: geração não tem sinal e um
/// total com sinais mistos produziria percentuais fora de [0, 100].
///
/// ```
/// use geracao_energia_por_estado::parse_geracao;
///
/// assert_eq!(parse_geracao("1,234"), Some(1234.0));
/// assert_eq!(parse_geracao("abc"), None);
/// assert_eq!(parse_geracao("-5"), None);
/// ```
pub fn parse_geracao(campo: &str) -> Option<f64> {
    let limpo: String = campo.chars().filter(|&c| c != ',').collect();
    let limpo = limpo.trim();

    if !RE_NUMERO_DECIMAL.is_match(limpo) {
        return None;
    }

    limpo
        .parse::<f64>()
        .ok()
        .filter(|valor| valor.is_finite() && *valor >= 0.0)
}

pub fn parse_ano(campo: &str) -> Option<i32> {
    RE_ANO
        .captures(campo.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|inteiro| inteiro.as_str().parse().ok())
}

/// Valida o cabeçalho: cada coluna essencial deve aparecer exatamente uma vez.
///
/// Colunas extras são ignoradas, mesmo sem nome (ex: índice salvo junto com o CSV)
/// ou repetidas.
pub fn verificar_existencia_de_colunas_essenciais(
    column_names: &[&str],
    arquivo: &Path,
) -> PainelResult<()> {
    if let Some(repetida) = COLUNAS_ESSENCIAIS.into_iter().find(|essencial| {
        column_names
            .iter()
            .filter(|name| *name == essencial)
            .count()
            > 1
    }) {
        return Err(PainelError::DuplicateColumnName {
            arquivo: arquivo.to_path_buf(),
            coluna: repetida.to_string(),
        });
    }

    if let Some(ausente) = COLUNAS_ESSENCIAIS
        .into_iter()
        .find(|essencial| !column_names.contains(essencial))
    {
        return Err(PainelError::MissingEssentialColumn {
            arquivo: arquivo.to_path_buf(),
            coluna: ausente.to_string(),
        });
    }

    Ok(())
}

/// Lê os registros de qualquer fonte CSV com cabeçalho.
///
/// `arquivo` é usado apenas para compor as mensagens de erro.
pub fn ler_registros<R: Read>(
    reader: R,
    arquivo: &Path,
    delimitador: u8,
) -> PainelResult<(Vec<RegistroGeracao>, EstatisticasDeCarga)> {
    // Somente o cabeçalho é aparado: os rótulos de energia exigem comparação exata.
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimitador)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .buffer_capacity(128 * 1024)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| PainelError::from_csv(e, arquivo.to_path_buf(), 1))?
        .clone();
    let column_names: Vec<&str> = headers.iter().collect();

    verificar_existencia_de_colunas_essenciais(&column_names, arquivo)?;

    let mut estatisticas = EstatisticasDeCarga::default();
    let mut registros = Vec::new();

    for (idx, result) in rdr.deserialize::<LinhaBruta>().enumerate() {
        let linha = result.map_err(|e| {
            let num_linha = e
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            PainelError::from_csv(e, arquivo.to_path_buf(), num_linha)
        })?;

        if canonizar_tipo_energia(&linha.tipo_energia).is_none() {
            estatisticas
                .rotulos_nao_mapeados
                .insert(linha.tipo_energia.clone());
        }

        let registro = RegistroGeracao::from(linha);

        estatisticas.linhas += 1;
        if registro.ano.is_none() {
            estatisticas.anos_invalidos += 1;
        }
        if registro.geracao.is_none() {
            estatisticas.valores_invalidos += 1;
        }

        registros.push(registro);
    }

    Ok((registros, estatisticas))
}

/// Lê o arquivo inteiro, calcula a impressão digital e interpreta os registros.
pub fn carregar_arquivo(path: &Path, delimitador: u8) -> PainelResult<DadosCarregados> {
    let bytes = fs::read(path).map_err(|e| PainelError::IoReader {
        source: e,
        arquivo: path.to_path_buf(),
    })?;

    let impressao_digital = blake3::hash(&bytes);
    let (registros, estatisticas) = ler_registros(bytes.as_slice(), path, delimitador)?;

    tracing::debug!(
        arquivo = %path.display(),
        linhas = estatisticas.linhas,
        anos_invalidos = estatisticas.anos_invalidos,
        valores_invalidos = estatisticas.valores_invalidos,
        blake3 = %impressao_digital,
        "dados de geração carregados"
    );

    for rotulo in &estatisticas.rotulos_nao_mapeados {
        tracing::debug!(rotulo = ?rotulo, "rótulo de energia fora da tabela, mantido sem alteração");
    }

    Ok(DadosCarregados {
        arquivo: path.to_path_buf(),
        registros,
        estatisticas,
        impressao_digital,
    })
}

/// Dados carregados uma única vez por processo.
///
/// A primeira chamada a [`CacheDeDados::obter`] lê o arquivo; as seguintes devolvem
/// a mesma tabela compartilhada, somente leitura. Não há invalidação.
/// Chamadas concorrentes durante a primeira carga aguardam a mesma leitura.
#[derive(Debug)]
pub struct CacheDeDados {
    arquivo: PathBuf,
    delimitador: u8,
    dados: OnceLock<Arc<DadosCarregados>>,
    carga: Mutex<()>,
    leituras: AtomicUsize,
}

impl CacheDeDados {
    pub fn new(arquivo: impl Into<PathBuf>, delimitador: u8) -> Self {
        CacheDeDados {
            arquivo: arquivo.into(),
            delimitador,
            dados: OnceLock::new(),
            carga: Mutex::new(()),
            leituras: AtomicUsize::new(0),
        }
    }

    pub fn obter(&self) -> PainelResult<Arc<DadosCarregados>> {
        if let Some(dados) = self.dados.get() {
            return Ok(Arc::clone(dados));
        }

        // Uma única carga por vez; quem esperou encontra os dados já prontos.
        // O guarda não protege dados, então um lock envenenado pode ser reaproveitado.
        let _carga = self.carga.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(dados) = self.dados.get() {
            return Ok(Arc::clone(dados));
        }

        let carregados = Arc::new(carregar_arquivo(&self.arquivo, self.delimitador)?);
        self.leituras.fetch_add(1, Ordering::Relaxed);

        Ok(Arc::clone(self.dados.get_or_init(|| carregados)))
    }

    /// Quantas vezes o arquivo foi efetivamente lido.
    pub fn leituras(&self) -> usize {
        self.leituras.load(Ordering::Relaxed)
    }
}
