use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::{ESTADO_BRASIL, GERACAO_TOTAL, RegistroGeracao, comparar_tipos};

/// Uma linha (ano) da matriz Ano × Tipo de energia.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinhaAnual {
    pub ano: i32,
    /// Soma dos valores brutos da linha.
    pub total: f64,
    /// Valores brutos, alinhados com [`DistribuicaoAnual::tipos`].
    pub valores: Vec<f64>,
    /// Percentuais do total, alinhados com [`DistribuicaoAnual::tipos`].
    pub percentuais: Vec<f64>,
}

impl LinhaAnual {
    /// Linhas com total zero não possuem distribuição definida.
    pub fn tem_total(&self) -> bool {
        self.total != 0.0
    }
}

/// Distribuição percentual da geração por tipo de energia, ano a ano, de um estado.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistribuicaoAnual {
    pub estado: String,
    /// Colunas na ordem canônica.
    pub tipos: Vec<String>,
    /// Anos em ordem crescente.
    pub linhas: Vec<LinhaAnual>,
}

/// Formato longo consumido pelo gráfico: um ponto por (ano, tipo de energia).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PontoPercentual {
    pub estado: String,
    pub ano: i32,
    pub tipo_energia: String,
    pub percentual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntradaDominante {
    pub estado: String,
    pub ano: i32,
    pub tipo_energia: String,
    pub percentual: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultadoEstado {
    pub distribuicao: DistribuicaoAnual,
    pub dominantes: Vec<EntradaDominante>,
}

impl DistribuicaoAnual {
    pub fn is_empty(&self) -> bool {
        self.linhas.is_empty()
    }

    pub fn anos(&self) -> impl Iterator<Item = i32> + '_ {
        self.linhas.iter().map(|linha| linha.ano)
    }

    pub fn percentual(&self, ano: i32, tipo: &str) -> Option<f64> {
        let coluna = self.tipos.iter().position(|t| t == tipo)?;
        self.linhas
            .iter()
            .find(|linha| linha.ano == ano)
            .map(|linha| linha.percentuais[coluna])
    }

    pub fn para_formato_longo(&self) -> Vec<PontoPercentual> {
        self.linhas
            .iter()
            .flat_map(|linha| {
                self.tipos
                    .iter()
                    .zip(&linha.percentuais)
                    .map(|(tipo, &percentual)| PontoPercentual {
                        estado: self.estado.clone(),
                        ano: linha.ano,
                        tipo_energia: tipo.clone(),
                        percentual,
                    })
            })
            .collect()
    }
}

/// Estados distintos, com `BRASIL` primeiro e os demais em ordem alfabética.
///
/// ```
/// use geracao_energia_por_estado::{RegistroGeracao, listar_estados};
///
/// let registro = |estado: &str| RegistroGeracao {
///     estado: estado.to_string(),
///     ano: Some(2020),
///     tipo_energia: "Solar".to_string(),
///     geracao: Some(1.0),
/// };
///
/// let registros = [registro("SP"), registro("BRASIL"), registro("AC"), registro("SP")];
/// assert_eq!(listar_estados(&registros), ["BRASIL", "AC", "SP"]);
/// ```
pub fn listar_estados(registros: &[RegistroGeracao]) -> Vec<String> {
    let distintos: BTreeSet<&str> = registros.iter().map(|r| r.estado.as_str()).collect();

    let mut estados: Vec<String> = distintos
        .into_iter()
        .filter(|&estado| estado != ESTADO_BRASIL)
        .map(String::from)
        .collect();

    if registros.iter().any(|r| r.estado == ESTADO_BRASIL) {
        estados.insert(0, ESTADO_BRASIL.to_string());
    }

    estados
}

/// Estado a exibir: o pedido pelo usuário ou, na falta dele, o primeiro da lista.
///
/// Um estado sem dados não é erro: o gráfico correspondente fica vazio.
pub fn escolher_estado(estados: &[String], pedido: Option<&str>) -> String {
    match pedido {
        Some(estado) => {
            if !estados.iter().any(|e| e == estado) {
                tracing::warn!(
                    estado,
                    "estado sem registros no arquivo; incluído no seletor com o gráfico vazio"
                );
            }
            estado.to_string()
        }
        None => estados
            .first()
            .cloned()
            .unwrap_or_else(|| ESTADO_BRASIL.to_string()),
    }
}

/// Pivota os registros de um estado em percentuais por ano e tipo de energia.
///
/// Etapas:
/// 1. Seleciona o estado e descarta a categoria agregada `Geração Total`.
/// 2. Descarta registros sem ano.
/// 3. Mantém apenas a primeira ocorrência de cada par (ano, tipo).
/// 4. Monta a matriz Ano × Tipo; células ausentes e valores inválidos valem zero.
/// 5. Remove colunas zeradas em todos os anos.
/// 6. Converte cada linha em percentual do total da linha. Linhas de total zero
///    permanecem no eixo com todos os percentuais iguais a zero.
pub fn calcular_distribuicao(registros: &[RegistroGeracao], estado: &str) -> DistribuicaoAnual {
    let mut vistos: HashSet<(i32, &str)> = HashSet::new();
    let mut celulas: BTreeMap<i32, HashMap<&str, f64>> = BTreeMap::new();
    let mut duplicados = 0usize;

    for registro in registros
        .iter()
        .filter(|r| r.estado == estado && r.tipo_energia != GERACAO_TOTAL)
    {
        let Some(ano) = registro.ano else {
            continue;
        };

        let tipo = registro.tipo_energia.as_str();
        if !vistos.insert((ano, tipo)) {
            duplicados += 1;
            continue;
        }

        celulas
            .entry(ano)
            .or_default()
            .insert(tipo, registro.geracao.unwrap_or(0.0));
    }

    if duplicados > 0 {
        tracing::debug!(estado, duplicados, "pares (ano, tipo) repetidos descartados");
    }

    let mut tipos: Vec<&str> = celulas
        .values()
        .flat_map(|linha| linha.iter())
        .filter(|&(_, &valor)| valor != 0.0)
        .map(|(&tipo, _)| tipo)
        .collect::<HashSet<&str>>()
        .into_iter()
        .collect();

    tipos.sort_by(|a, b| comparar_tipos(a, b));

    let linhas = celulas
        .into_iter()
        .map(|(ano, linha)| {
            let valores: Vec<f64> = tipos
                .iter()
                .map(|tipo| linha.get(tipo).copied().unwrap_or(0.0))
                .collect();

            let total: f64 = valores.iter().sum();

            let percentuais = if total != 0.0 {
                valores.iter().map(|valor| valor / total * 100.0).collect()
            } else {
                vec![0.0; valores.len()]
            };

            LinhaAnual {
                ano,
                total,
                valores,
                percentuais,
            }
        })
        .collect();

    DistribuicaoAnual {
        estado: estado.to_string(),
        tipos: tipos.into_iter().map(String::from).collect(),
        linhas,
    }
}

/// Categoria de maior percentual em cada ano.
///
/// Empates ficam com a primeira coluna na ordem canônica. Anos de total zero
/// não possuem categoria dominante.
pub fn extrair_dominantes(distribuicao: &DistribuicaoAnual) -> Vec<EntradaDominante> {
    distribuicao
        .linhas
        .iter()
        .filter(|linha| linha.tem_total())
        .filter_map(|linha| {
            let (coluna, &percentual) = linha
                .percentuais
                .iter()
                .enumerate()
                .fold(None, |melhor: Option<(usize, &f64)>, (i, p)| match melhor {
                    Some((_, m)) if p <= m => melhor,
                    _ => Some((i, p)),
                })?;

            Some(EntradaDominante {
                estado: distribuicao.estado.clone(),
                ano: linha.ano,
                tipo_energia: distribuicao.tipos[coluna].clone(),
                percentual,
            })
        })
        .collect()
}

pub fn processar_estado(registros: &[RegistroGeracao], estado: &str) -> ResultadoEstado {
    let distribuicao = calcular_distribuicao(registros, estado);
    let dominantes = extrair_dominantes(&distribuicao);

    ResultadoEstado {
        distribuicao,
        dominantes,
    }
}

/// Processa os estados em paralelo; o resultado segue a ordem de `estados`.
pub fn processar_todos_os_estados(
    registros: &[RegistroGeracao],
    estados: &[String],
) -> Vec<ResultadoEstado> {
    estados
        .par_iter()
        .map(|estado| processar_estado(registros, estado))
        .collect()
}
