use std::collections::{BTreeMap, HashMap};

use super::bocadillos::recalcular_bocadillos;
use crate::db::{Database, CLAVE_INSUMOS, CLAVE_PROVEEDORES};
use crate::error::AppError;
use crate::models::{AgruparPor, Insumo, NuevoInsumo, Proveedor};
use crate::utils::generar_id;

const SIN_PROVEEDOR: &str = "Sin Proveedor";

fn validar(nombre: &str, costo: f64, cantidad_medida: f64, unidad: &str) -> Result<(), AppError> {
    if nombre.trim().is_empty() {
        return Err(AppError::validacion("El nombre del insumo es requerido"));
    }
    if !costo.is_finite() || costo < 0.0 {
        return Err(AppError::validacion("El costo no puede ser negativo"));
    }
    if !cantidad_medida.is_finite() || cantidad_medida <= 0.0 {
        return Err(AppError::validacion("La cantidad de compra debe ser mayor a cero"));
    }
    if unidad.trim().is_empty() {
        return Err(AppError::validacion("La unidad de medida es requerida"));
    }
    Ok(())
}

pub fn listar_insumos(db: &Database) -> Result<Vec<Insumo>, AppError> {
    let mut insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    insumos.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
    Ok(insumos)
}

pub fn obtener_insumo(db: &Database, id: &str) -> Result<Insumo, AppError> {
    db.leer_lista::<Insumo>(CLAVE_INSUMOS)?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| AppError::no_encontrado("Insumo", id))
}

pub fn crear_insumo(db: &Database, insumo: NuevoInsumo) -> Result<Insumo, AppError> {
    validar(&insumo.nombre, insumo.costo, insumo.cantidad_medida, &insumo.unidad_medida)?;

    let mut insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let nuevo = insumo.con_id(generar_id());
    insumos.push(nuevo.clone());
    db.guardar(CLAVE_INSUMOS, &insumos)?;

    recalcular_bocadillos(db, &insumos)?;
    Ok(nuevo)
}

/// Actualiza el insumo y recalcula los precios de los bocadillos que lo usan.
/// Retorna cuántos bocadillos cambiaron de precio.
pub fn actualizar_insumo(db: &Database, insumo: Insumo) -> Result<usize, AppError> {
    validar(&insumo.nombre, insumo.costo, insumo.cantidad_medida, &insumo.unidad_medida)?;

    let mut insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let existente = insumos
        .iter_mut()
        .find(|i| i.id == insumo.id)
        .ok_or_else(|| AppError::no_encontrado("Insumo", insumo.id.clone()))?;
    *existente = insumo;
    db.guardar(CLAVE_INSUMOS, &insumos)?;

    recalcular_bocadillos(db, &insumos)
}

/// Las recetas que usaban el insumo dejan de sumar su costo.
pub fn eliminar_insumo(db: &Database, id: &str) -> Result<usize, AppError> {
    let mut insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let antes = insumos.len();
    insumos.retain(|i| i.id != id);

    if insumos.len() == antes {
        return Err(AppError::no_encontrado("Insumo", id));
    }

    db.guardar(CLAVE_INSUMOS, &insumos)?;
    recalcular_bocadillos(db, &insumos)
}

/// Agrupa los insumos por nombre de proveedor o por la primera palabra de su nombre.
pub fn agrupar_insumos(
    insumos: &[Insumo],
    proveedores: &[Proveedor],
    agrupar_por: AgruparPor,
) -> BTreeMap<String, Vec<Insumo>> {
    let nombres: HashMap<&str, &str> = proveedores
        .iter()
        .map(|p| (p.id.as_str(), p.nombre.as_str()))
        .collect();

    let mut grupos: BTreeMap<String, Vec<Insumo>> = BTreeMap::new();
    for insumo in insumos {
        let clave = match agrupar_por {
            AgruparPor::Nombre => insumo
                .nombre
                .to_lowercase()
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_string(),
            AgruparPor::Proveedor => nombres
                .get(insumo.proveedor_id.as_str())
                .copied()
                .unwrap_or(SIN_PROVEEDOR)
                .to_string(),
        };
        grupos.entry(clave).or_default().push(insumo.clone());
    }
    grupos
}

pub fn listar_insumos_agrupados(
    db: &Database,
    agrupar_por: AgruparPor,
) -> Result<BTreeMap<String, Vec<Insumo>>, AppError> {
    let insumos = listar_insumos(db)?;
    let proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    Ok(agrupar_insumos(&insumos, &proveedores, agrupar_por))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::bocadillos::obtener_bocadillo;
    use crate::commands::presupuestos::obtener_presupuesto;

    fn nuevo(nombre: &str, proveedor_id: &str) -> NuevoInsumo {
        NuevoInsumo {
            nombre: nombre.to_string(),
            proveedor_id: proveedor_id.to_string(),
            costo: 30.0,
            cantidad_medida: 1.0,
            unidad_medida: "kg".to_string(),
        }
    }

    #[test]
    fn test_crear_valida() {
        let db = Database::en_memoria().unwrap();
        let mut invalido = nuevo("Sal", "prov1");
        invalido.cantidad_medida = 0.0;
        assert!(crear_insumo(&db, invalido).is_err());

        let creado = crear_insumo(&db, nuevo("Sal", "prov1")).unwrap();
        assert_eq!(obtener_insumo(&db, &creado.id).unwrap(), creado);
    }

    #[test]
    fn test_actualizar_costo_reprecia_bocadillos_y_presupuestos_abiertos() {
        let db = Database::en_memoria().unwrap();
        let mut harina = obtener_insumo(&db, "ins1").unwrap();
        harina.costo = 40.0;

        let cambiados = actualizar_insumo(&db, harina).unwrap();
        assert!(cambiados >= 1);

        let galletas = obtener_bocadillo(&db, "boc1").unwrap();
        assert!(galletas.precio_venta > 5.70);
        assert_eq!(galletas.porcentaje_ganancia, 150.0);

        // pre1 está bloqueado, pre2 no
        let bloqueado = obtener_presupuesto(&db, "pre1").unwrap();
        assert_eq!(bloqueado.items[0].precio_unitario, 5.70);
        let abierto = obtener_presupuesto(&db, "pre2").unwrap();
        assert_eq!(abierto.items[0].precio_unitario, galletas.precio_venta);
        assert!((abierto.total - 100.0 * galletas.precio_venta).abs() < 1e-9);
    }

    #[test]
    fn test_eliminar_insumo() {
        let db = Database::en_memoria().unwrap();
        eliminar_insumo(&db, "ins3").unwrap();
        assert!(obtener_insumo(&db, "ins3").is_err());
        // Sin chispas, las galletas cuestan menos
        assert!(obtener_bocadillo(&db, "boc1").unwrap().precio_venta < 5.70);
        assert!(eliminar_insumo(&db, "ins3").is_err());
    }

    #[test]
    fn test_agrupar_por_proveedor() {
        let db = Database::en_memoria().unwrap();
        crear_insumo(&db, nuevo("Canela", "prov-borrado")).unwrap();
        let grupos = listar_insumos_agrupados(&db, AgruparPor::Proveedor).unwrap();

        let claves: Vec<&str> = grupos.keys().map(String::as_str).collect();
        assert_eq!(
            claves,
            vec![
                "Distribuidora La Canasta",
                "Harinas del Centro",
                "Mercado Fresco Local",
                "Sin Proveedor"
            ]
        );
        assert_eq!(grupos["Harinas del Centro"].len(), 2);
        assert_eq!(grupos["Sin Proveedor"][0].nombre, "Canela");
    }

    #[test]
    fn test_agrupar_por_nombre() {
        let db = Database::en_memoria().unwrap();
        crear_insumo(&db, nuevo("Harina Integral", "prov2")).unwrap();
        let grupos = listar_insumos_agrupados(&db, AgruparPor::Nombre).unwrap();
        assert_eq!(grupos["harina"].len(), 2);
        assert_eq!(grupos["huevo"].len(), 1);
    }
}
