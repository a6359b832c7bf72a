use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type PainelResult<T> = Result<T, PainelError>;

#[derive(Error, Debug)]
pub enum PainelError {
    #[error(
        "Erro no número de colunas!\n\
        Arquivo: {arquivo:?}\n\
        Linha nº: {linha}\n\
        Esperado: {esperado} colunas\n\
        Encontrado: {encontrado} colunas"
    )]
    ColumnCount {
        arquivo: PathBuf,
        linha: usize,
        esperado: usize,
        encontrado: usize,
    },

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error(
        "Erro no processamento CSV!\n\
        Arquivo: {arquivo:?}\n\
        Linha nº: {linha}\n\
        {source}"
    )]
    CsvLinha {
        #[source]
        source: csv::Error,
        arquivo: PathBuf,
        linha: usize,
    },

    #[error("Delimitador inválido: <{0}>. Esperado um único caractere ASCII (ex: ',' ou ';')")]
    DelimitadorInvalido(String),

    #[error("Arquivo <{arquivo:?}> contém colunas repetidas: <{coluna}>")]
    DuplicateColumnName { arquivo: PathBuf, coluna: String },

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo de dados de geração não encontrado ou ilegível!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source] // Indica que este é o erro original
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error(
        "Não foi possível gravar o gráfico!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoWriter {
        #[source]
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error("Erro ao serializar a especificação do gráfico: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Coluna essencial ausente no arquivo <{arquivo:?}>: {coluna}")]
    MissingEssentialColumn { arquivo: PathBuf, coluna: String },
}

impl PainelError {
    pub fn from_csv(e: csv::Error, arquivo: PathBuf, linha: usize) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } = e.kind()
        {
            return PainelError::ColumnCount {
                arquivo,
                linha,
                esperado: *expected_len as usize,
                encontrado: *len as usize,
            };
        }
        // Demais erros (UTF8, deserialização, IO) mantêm o erro original com a localização
        PainelError::CsvLinha {
            source: e,
            arquivo,
            linha,
        }
    }
}
