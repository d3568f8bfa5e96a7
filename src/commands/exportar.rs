use crate::commands::bocadillos::listar_costos_bocadillos;
use crate::commands::insumos::listar_insumos;
use crate::db::{Database, CLAVE_PROVEEDORES};
use crate::error::AppError;
use crate::models::Proveedor;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// BOM UTF-8 para que Excel abra correctamente caracteres especiales
const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Separador de columnas (punto y coma para Excel en español)
const SEP: &str = ";";

fn escapar_csv(valor: &str) -> String {
    if valor.contains(';') || valor.contains('"') || valor.contains('\n') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

fn escribir_csv(ruta: &Path, headers: &[&str], filas: &[Vec<String>]) -> Result<(), AppError> {
    let mut file = std::fs::File::create(ruta)?;
    file.write_all(BOM)?;
    writeln!(file, "{}", headers.join(SEP))?;

    for fila in filas {
        let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
        writeln!(file, "{}", linea.join(SEP))?;
    }
    Ok(())
}

pub fn exportar_insumos_csv(db: &Database, ruta: &Path) -> Result<String, AppError> {
    let insumos = listar_insumos(db)?;
    let proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    let nombres: HashMap<&str, &str> = proveedores
        .iter()
        .map(|p| (p.id.as_str(), p.nombre.as_str()))
        .collect();

    let filas: Vec<Vec<String>> = insumos
        .iter()
        .map(|i| {
            vec![
                i.nombre.clone(),
                nombres.get(i.proveedor_id.as_str()).copied().unwrap_or("Sin Proveedor").to_string(),
                format!("{:.2}", i.costo),
                format!("{}", i.cantidad_medida),
                i.unidad_medida.clone(),
            ]
        })
        .collect();

    let headers = ["Nombre", "Proveedor", "Costo", "Cantidad", "Unidad"];
    escribir_csv(ruta, &headers, &filas)?;

    Ok(format!("{} insumos exportados", filas.len()))
}

pub fn exportar_costos_csv(db: &Database, ruta: &Path) -> Result<String, AppError> {
    let costos = listar_costos_bocadillos(db)?;

    let filas: Vec<Vec<String>> = costos
        .iter()
        .map(|c| {
            vec![
                c.nombre.clone(),
                format!("{:.2}", c.costo_total),
                format!("{:.2}", c.costo_por_unidad),
                format!("{:.2}", c.precio_venta),
                format!("{:.2}", c.porcentaje_ganancia),
                format!("{:.2}", c.venta_receta),
            ]
        })
        .collect();

    let headers = [
        "Bocadillo", "Costo Receta", "Costo Unitario", "P. Venta", "Ganancia %", "Venta Receta",
    ];
    escribir_csv(ruta, &headers, &filas)?;

    Ok(format!("{} bocadillos exportados", filas.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapar() {
        assert_eq!(escapar_csv("simple"), "simple");
        assert_eq!(escapar_csv("a;b"), "\"a;b\"");
        assert_eq!(escapar_csv("dice \"hola\""), "\"dice \"\"hola\"\"\"");
    }

    #[test]
    fn test_exportar_insumos() {
        let db = Database::en_memoria().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("insumos.csv");

        let mensaje = exportar_insumos_csv(&db, &ruta).unwrap();
        assert_eq!(mensaje, "8 insumos exportados");

        let bytes = std::fs::read(&ruta).unwrap();
        assert!(bytes.starts_with(BOM));
        let texto = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        let lineas: Vec<&str> = texto.lines().collect();
        assert_eq!(lineas[0], "Nombre;Proveedor;Costo;Cantidad;Unidad");
        assert_eq!(lineas[1], "Azúcar Blanca;Distribuidora La Canasta;25.00;1;kg");
        assert_eq!(lineas.len(), 9);
    }

    #[test]
    fn test_exportar_costos() {
        let db = Database::en_memoria().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ruta = dir.path().join("costos.csv");

        exportar_costos_csv(&db, &ruta).unwrap();
        let texto = std::fs::read_to_string(&ruta).unwrap();
        assert!(texto.contains("Galletas de Chispas de Chocolate;54.75;2.28;5.70;150.00;136.80"));
    }
}
