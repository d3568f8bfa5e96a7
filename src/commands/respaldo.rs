use crate::db::{migraciones, semilla, Database};
use crate::error::AppError;
use serde_json::{Map, Value};
use std::path::Path;

/// Retorna la ruta actual de la base de datos
pub fn obtener_ruta_db(db: &Database) -> Result<String, AppError> {
    db.ruta()
        .map(|p| p.to_string_lossy().to_string())
        .ok_or_else(|| AppError::validacion("La base de datos está en memoria"))
}

/// Todo el almacén como un solo objeto JSON (clave → valor ya interpretado)
pub fn exportar_datos(db: &Database) -> Result<Value, AppError> {
    let mut datos = Map::new();
    for (clave, texto) in db.entradas()? {
        datos.insert(clave, serde_json::from_str(&texto)?);
    }
    Ok(Value::Object(datos))
}

pub fn exportar_a_archivo(db: &Database, destino: &Path) -> Result<usize, AppError> {
    let datos = exportar_datos(db)?;
    let total = datos.as_object().map(Map::len).unwrap_or(0);
    std::fs::write(destino, serde_json::to_string_pretty(&datos)?)?;

    tracing::info!(destino = %destino.display(), claves = total, "datos exportados");
    Ok(total)
}

/// Sobrescribe cada clave presente en `datos` y vuelve a correr las migraciones.
pub fn importar_datos(db: &Database, datos: &Value) -> Result<usize, AppError> {
    let objeto = datos
        .as_object()
        .ok_or_else(|| AppError::validacion("El respaldo debe ser un objeto JSON"))?;

    let entradas = objeto
        .iter()
        .map(|(clave, valor)| Ok((clave.clone(), serde_json::to_string(valor)?)))
        .collect::<Result<Vec<_>, AppError>>()?;

    db.guardar_varios(&entradas)?;
    migraciones::ejecutar_migraciones(db)?;

    Ok(entradas.len())
}

pub fn importar_desde_archivo(db: &Database, origen: &Path) -> Result<usize, AppError> {
    if !origen.exists() {
        return Err(AppError::validacion("El archivo de respaldo no existe"));
    }

    let texto = std::fs::read_to_string(origen)?;
    let datos: Value = serde_json::from_str(&texto)?;
    let total = importar_datos(db, &datos)?;

    tracing::info!(origen = %origen.display(), claves = total, "datos importados");
    Ok(total)
}

/// Elimina todos los datos y deja el almacén como recién instalado.
pub fn restablecer_datos(db: &Database) -> Result<usize, AppError> {
    let borradas = db.vaciar()?;
    migraciones::ejecutar_migraciones(db)?;
    semilla::sembrar_datos_iniciales(db)?;

    tracing::warn!(claves = borradas, "datos restablecidos");
    Ok(borradas)
}
