mod args;
mod carregador;
mod distribuicao;
mod energia;
mod error;
mod grafico;
mod regex;
mod registro;
mod relatorio;

pub use self::{
    args::*, carregador::*, distribuicao::*, energia::*, error::*, grafico::*, regex::*,
    registro::*, relatorio::*,
};
