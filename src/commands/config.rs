use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use crate::db::{Database, CLAVE_EMPRESA};
use crate::error::AppError;
use crate::models::EmpresaInfo;
use std::path::Path;

const TAMANO_MAXIMO_LOGO: usize = 500_000;

pub fn obtener_empresa(db: &Database) -> Result<EmpresaInfo, AppError> {
    Ok(db.leer::<Option<EmpresaInfo>>(CLAVE_EMPRESA)?.flatten().unwrap_or_default())
}

pub fn guardar_empresa(db: &Database, empresa: &EmpresaInfo) -> Result<(), AppError> {
    if empresa.nombre.trim().is_empty() {
        return Err(AppError::validacion("El nombre de la empresa es requerido"));
    }
    db.guardar(CLAVE_EMPRESA, empresa)
}

fn tipo_mime(ruta: &Path) -> Result<&'static str, AppError> {
    let extension = ruta
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        "svg" => Ok("image/svg+xml"),
        _ => Err(AppError::validacion(format!(
            "Formato de imagen no soportado: '{}'",
            extension
        ))),
    }
}

/// Guarda el logo como data URL en la información de la empresa.
pub fn cargar_logo(db: &Database, ruta: &Path) -> Result<String, AppError> {
    let mime = tipo_mime(ruta)?;
    let bytes = std::fs::read(ruta)?;

    if bytes.len() > TAMANO_MAXIMO_LOGO {
        return Err(AppError::validacion("La imagen es demasiado grande. Máximo 500KB."));
    }

    let mut empresa = obtener_empresa(db)?;
    empresa.logo_url = Some(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)));
    db.guardar(CLAVE_EMPRESA, &empresa)?;

    Ok("Logo cargado correctamente".to_string())
}

pub fn eliminar_logo(db: &Database) -> Result<String, AppError> {
    let mut empresa = obtener_empresa(db)?;
    empresa.logo_url = Some(String::new());
    db.guardar(CLAVE_EMPRESA, &empresa)?;

    Ok("Logo eliminado".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guardar_y_obtener() {
        let db = Database::en_memoria().unwrap();
        let mut empresa = obtener_empresa(&db).unwrap();
        assert_eq!(empresa.nombre, "BocadilloPro");

        empresa.nombre = "Dulces Lupita".to_string();
        guardar_empresa(&db, &empresa).unwrap();
        assert_eq!(obtener_empresa(&db).unwrap(), empresa);
    }

    #[test]
    fn test_empresa_nula_usa_valores_por_defecto() {
        let db = Database::en_memoria().unwrap();
        db.guardar_texto(CLAVE_EMPRESA, "null").unwrap();
        assert_eq!(obtener_empresa(&db).unwrap(), EmpresaInfo::default());
    }

    #[test]
    fn test_cargar_y_eliminar_logo() {
        let db = Database::en_memoria().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("logo.PNG");
        std::fs::write(&ruta, [0x89, b'P', b'N', b'G']).unwrap();

        cargar_logo(&db, &ruta).unwrap();
        let logo = obtener_empresa(&db).unwrap().logo_url.unwrap();
        assert_eq!(logo, "data:image/png;base64,iVBORw==");

        eliminar_logo(&db).unwrap();
        assert_eq!(obtener_empresa(&db).unwrap().logo_url.as_deref(), Some(""));
    }

    #[test]
    fn test_logo_demasiado_grande() {
        let db = Database::en_memoria().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("logo.jpg");
        std::fs::write(&ruta, vec![0u8; TAMANO_MAXIMO_LOGO + 1]).unwrap();
        assert!(matches!(cargar_logo(&db, &ruta), Err(AppError::Validacion(_))));
    }

    #[test]
    fn test_formato_no_soportado() {
        let db = Database::en_memoria().unwrap();
        assert!(cargar_logo(&db, Path::new("logo.bmp")).is_err());
    }
}
