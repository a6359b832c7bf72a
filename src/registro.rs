use tracing_subscriber::EnvFilter;

use crate::{PainelError, PainelResult};

/// Diagnósticos vão para stderr; o relatório continua em stdout.
///
/// `RUST_LOG` tem precedência; sem ele o nível é `info` (ou `debug` com `--verbose`).
pub fn iniciar_registro_de_eventos(verbose: bool) -> PainelResult<()> {
    let nivel = if verbose { "debug" } else { "info" };
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(nivel));

    tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| PainelError::Config(format!("falha ao iniciar o registro de eventos: {e}")))
}
