use std::process::Command;

use crate::{DadosCarregados, DistribuicaoAnual, PainelResult, ResultadoEstado};

/// Limpa o terminal quando `--clear` é informado.
pub fn clear_screen(limpar: bool) -> PainelResult<()> {
    if !limpar {
        return Ok(());
    }

    // 'cls' só existe como comando interno do cmd
    let (programa, argumentos): (&str, &[&str]) = if cfg!(target_os = "windows") {
        ("cmd", &["/c", "cls"])
    } else {
        ("clear", &[])
    };

    Command::new(programa).args(argumentos).status()?;
    Ok(())
}

/// Exibe a descrição e a versão do programa.
pub fn imprimir_versao_do_programa() {
    let descr = [
        "Este programa analisa a geração histórica de energia elétrica nos estados brasileiros.",
        "Os dados de entrada estão em formato longo: uma linha por (Estado, Ano, tipo de energia).",
        "Os rótulos bilíngues dos tipos de energia são convertidos para nomes em português.",
        "Para cada estado, a geração de cada ano é convertida em percentual do total do ano.",
        "O tipo de energia de maior participação em cada ano é indicado como dominante.",
        "O resultado é gravado em uma página HTML com gráfico de área empilhada e seletor de estado.",
    ];

    for line in &descr {
        println!(" {}", line);
    }

    println!("\n versão: {}\n", env!("CARGO_PKG_VERSION"));
}

/// Separador de milhar no padrão brasileiro.
///
/// ```
/// use geracao_energia_por_estado::fmt_milhares;
///
/// assert_eq!(fmt_milhares(1234567), "1.234.567");
/// ```
pub fn fmt_milhares(n: usize) -> String {
    let digitos = n.to_string();
    let cabeca = match digitos.len() % 3 {
        0 => 3.min(digitos.len()),
        resto => resto,
    };

    let grupos = std::iter::once(&digitos[..cabeca]).chain(
        (cabeca..digitos.len())
            .step_by(3)
            .map(|inicio| &digitos[inicio..inicio + 3]),
    );

    grupos.collect::<Vec<_>>().join(".")
}

/// Número com `casas` decimais: milhar com ponto e decimais com vírgula.
///
/// ```
/// use geracao_energia_por_estado::fmt_decimal;
///
/// assert_eq!(fmt_decimal(1234.5, 2), "1.234,50");
/// assert_eq!(fmt_decimal(-0.125, 1), "-0,1");
/// ```
pub fn fmt_decimal(valor: f64, casas: usize) -> String {
    let texto = format!("{:.*}", casas, valor.abs());
    let (inteiro, fracao) = texto.split_once('.').unwrap_or((texto.as_str(), ""));

    let inteiro = inteiro
        .parse::<usize>()
        .map(fmt_milhares)
        .unwrap_or_else(|_| inteiro.to_string());

    let sinal = if valor < 0.0 && texto.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    if fracao.is_empty() {
        format!("{sinal}{inteiro}")
    } else {
        format!("{sinal}{inteiro},{fracao}")
    }
}

pub fn imprimir_resumo_de_carga(dados: &DadosCarregados) {
    let est = &dados.estatisticas;

    println!(" Arquivo de dados: <{}>", dados.arquivo.display());
    println!(" Impressão digital (blake3): {}", dados.impressao_digital);
    println!(" Linhas lidas: {:>9}", fmt_milhares(est.linhas));
    println!(" Anos inválidos: {:>7}", fmt_milhares(est.anos_invalidos));
    println!(" Valores inválidos: {:>4}", fmt_milhares(est.valores_invalidos));

    if !est.rotulos_nao_mapeados.is_empty() {
        println!(" Tipos de energia fora da tabela de rótulos (mantidos sem alteração):");
        for rotulo in &est.rotulos_nao_mapeados {
            println!("  -> {:?}", rotulo);
        }
    }
    println!();
}

pub fn imprimir_estados(estados: &[String]) {
    println!(" Estados disponíveis:\n");
    estados.iter().enumerate().for_each(|(i, estado)| {
        println!("{:6}: {}", i + 1, estado);
    });
    println!();
}

/// Linhas do relatório de dominantes: uma por ano.
pub fn linhas_de_dominantes(resultado: &ResultadoEstado) -> Vec<String> {
    let dist = &resultado.distribuicao;

    let max_len = resultado
        .dominantes
        .iter()
        .map(|d| d.tipo_energia.chars().count())
        .max()
        .unwrap_or_default();

    dist.linhas
        .iter()
        .map(|linha| {
            match resultado.dominantes.iter().find(|d| d.ano == linha.ano) {
                Some(d) => format!(
                    " {} : {:<max_len$} {:>7} %",
                    linha.ano,
                    d.tipo_energia,
                    fmt_decimal(d.percentual, 2)
                ),
                None => format!(" {} : sem geração registrada", linha.ano),
            }
        })
        .collect()
}

pub fn imprimir_dominantes(resultado: &ResultadoEstado) {
    let estado = &resultado.distribuicao.estado;

    if resultado.distribuicao.is_empty() {
        println!(" Nenhum dado de geração para o estado <{estado}>.\n");
        return;
    }

    println!(" --- Tipo de energia dominante por ano: {estado} ---");
    for linha in linhas_de_dominantes(resultado) {
        println!("{linha}");
    }
    println!();
}

/// Tabela completa de percentuais (anos nas linhas, tipos nas colunas).
pub fn linhas_da_tabela(dist: &DistribuicaoAnual) -> Vec<String> {
    let larguras: Vec<usize> = dist
        .tipos
        .iter()
        .map(|tipo| tipo.chars().count().max(7))
        .collect();

    let cabecalho = dist
        .tipos
        .iter()
        .zip(&larguras)
        .fold(String::from("  Ano"), |mut acc, (tipo, &w)| {
            acc.push_str(&format!(" | {tipo:>w$}"));
            acc
        });

    let mut linhas = vec![cabecalho];

    linhas.extend(dist.linhas.iter().map(|linha| {
        linha
            .percentuais
            .iter()
            .zip(&larguras)
            .fold(format!(" {}", linha.ano), |mut acc, (&p, &w)| {
                acc.push_str(&format!(" | {:>w$}", fmt_decimal(p, 2)));
                acc
            })
    }));

    linhas
}

pub fn imprimir_tabela(dist: &DistribuicaoAnual) {
    if dist.is_empty() {
        return;
    }

    println!(" --- Percentual da geração por tipo de energia: {} ---", dist.estado);
    for linha in linhas_da_tabela(dist) {
        println!("{linha}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegistroGeracao, processar_estado};

    fn resultado_de_teste() -> ResultadoEstado {
        let registro = |ano: i32, tipo: &str, geracao: f64| RegistroGeracao {
            estado: "RJ".to_string(),
            ano: Some(ano),
            tipo_energia: tipo.to_string(),
            geracao: Some(geracao),
        };

        processar_estado(
            &[
                registro(2019, "Nuclear", 0.0),
                registro(2020, "Nuclear", 1500.0),
                registro(2020, "Gás Natural", 500.0),
            ],
            "RJ",
        )
    }

    #[test]
    fn milhares_no_padrao_brasileiro() {
        assert_eq!(fmt_milhares(0), "0");
        assert_eq!(fmt_milhares(999), "999");
        assert_eq!(fmt_milhares(1000), "1.000");
        assert_eq!(fmt_milhares(12_345_678), "12.345.678");
    }

    #[test]
    fn decimais_com_virgula() {
        assert_eq!(fmt_decimal(100.0, 2), "100,00");
        assert_eq!(fmt_decimal(33.333, 2), "33,33");
        assert_eq!(fmt_decimal(1_234_567.891, 1), "1.234.567,9");
        assert_eq!(fmt_decimal(-0.001, 2), "0,00");
        assert_eq!(fmt_decimal(-12.4, 0), "-12");
    }

    #[test]
    fn relatorio_de_dominantes() {
        let linhas = linhas_de_dominantes(&resultado_de_teste());

        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[0], " 2019 : sem geração registrada");
        assert!(linhas[1].starts_with(" 2020 : Nuclear"));
        assert!(linhas[1].ends_with("75,00 %"));
    }

    #[test]
    fn tabela_com_cabecalho_e_uma_linha_por_ano() {
        let linhas = linhas_da_tabela(&resultado_de_teste().distribuicao);

        assert_eq!(linhas.len(), 3);
        assert!(linhas[0].contains("Nuclear"));
        assert!(linhas[0].contains("Gás Natural"));
        assert!(linhas[1].starts_with(" 2019"));
        assert!(linhas[2].contains("75,00"));
        assert!(linhas[2].contains("25,00"));
    }
}
