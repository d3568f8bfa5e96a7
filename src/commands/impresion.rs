use crate::commands::config::obtener_empresa;
use crate::commands::presupuestos::obtener_presupuesto;
use crate::db::{Database, CLAVE_BOCADILLOS};
use crate::error::AppError;
use crate::models::Bocadillo;
use crate::printing::generar_presupuesto_texto;
use std::path::Path;

/// Texto listo para imprimir de un presupuesto
pub fn imprimir_presupuesto(db: &Database, id: &str) -> Result<String, AppError> {
    let presupuesto = obtener_presupuesto(db, id)?;
    let bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let empresa = obtener_empresa(db)?;

    Ok(generar_presupuesto_texto(&presupuesto, &bocadillos, Some(&empresa)))
}

pub fn guardar_presupuesto_texto(db: &Database, id: &str, ruta: &Path) -> Result<(), AppError> {
    let texto = imprimir_presupuesto(db, id)?;
    std::fs::write(ruta, texto.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imprimir_presupuesto_semilla() {
        let db = Database::en_memoria().unwrap();
        let texto = imprimir_presupuesto(&db, "pre1").unwrap();
        assert!(texto.contains("Fiesta Infantil Pérez"));
        assert!(texto.contains("Pastelitos de Fresa"));
        assert!(texto.contains("$440.40"));
        assert!(imprimir_presupuesto(&db, "nada").is_err());
    }

    #[test]
    fn test_guardar_texto() {
        let db = Database::en_memoria().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("pre2.txt");
        guardar_presupuesto_texto(&db, "pre2", &ruta).unwrap();
        assert!(std::fs::read_to_string(&ruta).unwrap().contains("Reunión Corporativa Acme"));
    }
}
