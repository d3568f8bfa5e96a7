//! Configuración de arranque: ubicación de la base de datos y filtro de logs.

use std::path::PathBuf;

pub const VAR_RUTA_DB: &str = "BOCADILLO_PRO_DB";
pub const VAR_LOG: &str = "BOCADILLO_PRO_LOG";
pub const NOMBRE_DB: &str = "bocadillo-pro.db";

/// Ruta de la base de datos: argumento explícito, luego `BOCADILLO_PRO_DB`,
/// luego el directorio de datos del usuario.
pub fn resolver_ruta_db(explicita: Option<PathBuf>) -> PathBuf {
    if let Some(ruta) = explicita {
        return ruta;
    }
    if let Some(ruta) = std::env::var_os(VAR_RUTA_DB).filter(|v| !v.is_empty()) {
        return PathBuf::from(ruta);
    }
    let mut path = directorio_datos().unwrap_or_else(|| PathBuf::from("."));
    path.push(NOMBRE_DB);
    path
}

/// Retorna el directorio de datos de la aplicación
fn directorio_datos() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("BocadilloPro"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".bocadillo-pro"))
    }
}
