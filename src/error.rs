/// Errores de la aplicación.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("error de base de datos: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("error de archivo: {0}")]
    Io(#[from] std::io::Error),

    #[error("la base de datos quedó bloqueada por un error previo")]
    Bloqueo,

    #[error("{entidad} no encontrado: {id}")]
    NoEncontrado { entidad: &'static str, id: String },

    #[error("{0}")]
    Validacion(String),
}

impl AppError {
    pub fn no_encontrado(entidad: &'static str, id: impl Into<String>) -> Self {
        AppError::NoEncontrado {
            entidad,
            id: id.into(),
        }
    }

    pub fn validacion(mensaje: impl Into<String>) -> Self {
        AppError::Validacion(mensaje.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        AppError::Bloqueo
    }
}
