pub mod cli;
pub mod commands;
pub mod config;
pub mod costeo;
pub mod db;
pub mod error;
pub mod models;
pub mod printing;
pub mod utils;

use db::Database;
use error::AppError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Inicializa los logs a stderr. Respeta `BOCADILLO_PRO_LOG`; por defecto `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(config::VAR_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Abre la base de datos resuelta y ejecuta el subcomando.
pub fn run(db: Option<PathBuf>, command: cli::Commands) -> Result<(), AppError> {
    let ruta = config::resolver_ruta_db(db);
    tracing::debug!(ruta = %ruta.display(), "abriendo base de datos");
    let database = Database::new(&ruta)?;
    cli::dispatch(&database, command)
}
