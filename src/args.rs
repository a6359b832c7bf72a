use clap::Parser;
use std::path::PathBuf;

use crate::{OpcoesDoGrafico, PainelError, PainelResult};

/// Nome fixo do arquivo de dados publicado pela Tecnocracia.
pub const ARQUIVO_PADRAO: &str =
    "Tecnocracia 84 - energia gerada historicamente pelos estados - Long_Format_Energy_Data.csv";

pub const GRAFICO_PADRAO: &str = "energia_por_estado.html";

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Clear screen
    #[arg(short, long, default_value_t = false)]
    clear: bool,

    /// Delimitador de campos do arquivo CSV
    #[arg(short, long, default_value_t = ',')]
    delimitador: char,

    /// Estado exibido inicialmente (padrão: BRASIL)
    #[arg(short, long)]
    estado: Option<String>,

    /// Arquivo CSV em formato longo.
    ///
    /// Colunas esperadas: `Estado`, `Year`, `tipo_energia`, `geracao`
    #[arg(short, long, default_value = ARQUIVO_PADRAO)]
    input: PathBuf,

    /// Listar os estados disponíveis e sair
    #[arg(long, default_value_t = false)]
    listar_estados: bool,

    /// Arquivo HTML de saída com o gráfico
    #[arg(short, long, default_value = GRAFICO_PADRAO)]
    output: PathBuf,

    /// Não gravar o gráfico HTML
    #[arg(long, default_value_t = false)]
    sem_html: bool,

    /// Imprimir a tabela completa de percentuais do estado
    #[arg(long, default_value_t = false)]
    tabela: bool,

    /// Largura do gráfico em pixels
    #[arg(long, default_value_t = 1200)]
    largura: u32,

    /// Altura do gráfico em pixels
    #[arg(long, default_value_t = 800)]
    altura: u32,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub clear: bool,
    pub delimitador: u8,
    pub estado: Option<String>,
    pub input: PathBuf,
    pub listar_estados: bool,
    pub output: PathBuf,
    pub sem_html: bool,
    pub tabela: bool,
    pub grafico: OpcoesDoGrafico,
    pub verbose: bool,
}

/// Converte o delimitador informado em um único byte ASCII.
pub fn delimitador_em_byte(delimitador: char) -> PainelResult<u8> {
    if delimitador.is_ascii() && !delimitador.is_ascii_control() || delimitador == '\t' {
        Ok(delimitador as u8)
    } else {
        Err(PainelError::DelimitadorInvalido(delimitador.to_string()))
    }
}

pub fn get_config() -> PainelResult<Config> {
    let args = Arguments::parse();
    config_from_args(args)
}

fn config_from_args(args: Arguments) -> PainelResult<Config> {
    if args.largura == 0 || args.altura == 0 {
        return Err(PainelError::Config(format!(
            "dimensões do gráfico inválidas: {}x{}",
            args.largura, args.altura
        )));
    }

    Ok(Config {
        clear: args.clear,
        delimitador: delimitador_em_byte(args.delimitador)?,
        estado: args.estado.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
        input: args.input,
        listar_estados: args.listar_estados,
        output: args.output,
        sem_html: args.sem_html,
        tabela: args.tabela,
        grafico: OpcoesDoGrafico {
            largura: args.largura,
            altura: args.altura,
        },
        verbose: args.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(argv: &[&str]) -> PainelResult<Config> {
        let args = Arguments::try_parse_from(argv).unwrap();
        config_from_args(args)
    }

    #[test]
    fn valores_padrao() {
        let config = config(&["programa"]).unwrap();

        assert_eq!(config.input, PathBuf::from(ARQUIVO_PADRAO));
        assert_eq!(config.output, PathBuf::from(GRAFICO_PADRAO));
        assert_eq!(config.delimitador, b',');
        assert_eq!(config.estado, None);
        assert_eq!(config.grafico, OpcoesDoGrafico::default());
        assert!(!config.listar_estados && !config.tabela && !config.sem_html);
    }

    #[test]
    fn argumentos_informados() {
        let config = config(&[
            "programa", "-i", "dados.csv", "-e", " SP ", "-d", ";", "--tabela", "--largura", "900",
        ])
        .unwrap();

        assert_eq!(config.input, PathBuf::from("dados.csv"));
        assert_eq!(config.estado.as_deref(), Some("SP"));
        assert_eq!(config.delimitador, b';');
        assert!(config.tabela);
        assert_eq!(config.grafico.largura, 900);
    }

    #[test]
    fn delimitadores_invalidos() {
        assert_eq!(delimitador_em_byte('\t').unwrap(), b'\t');
        assert!(matches!(
            delimitador_em_byte('§'),
            Err(PainelError::DelimitadorInvalido(_))
        ));
        assert!(config(&["programa", "--altura", "0"]).is_err());
    }
}
