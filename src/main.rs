//! BocadilloPro: costeo de recetas y presupuestos desde la terminal.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bocadillo-pro",
    version,
    about = "Insumos, recetas, precios y presupuestos para negocios de bocadillos"
)]
struct Cli {
    /// Archivo de base de datos (por defecto BOCADILLO_PRO_DB o el directorio de datos del usuario)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: bocadillo_pro::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    bocadillo_pro::init_tracing();
    if let Err(e) = bocadillo_pro::run(cli.db, cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
