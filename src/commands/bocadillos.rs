use super::presupuestos::refrescar_presupuestos_abiertos;
use crate::costeo::margen::PrecioMargen;
use crate::costeo::precios::recalcular_precios_bocadillos;
use crate::costeo::receta::{costear_receta, mapa_insumos};
use crate::costeo::unidades::unidades_compatibles;
use crate::db::{Database, CLAVE_BOCADILLOS, CLAVE_INSUMOS};
use crate::error::AppError;
use crate::models::{Bocadillo, BocadilloInsumo, CostoBocadillo, Insumo, NuevoBocadillo};
use crate::utils::generar_id;

fn validar(
    nombre: &str,
    bocadillo_insumos: &[BocadilloInsumo],
    cantidad_receta: f64,
    insumos: &[Insumo],
) -> Result<(), AppError> {
    if nombre.trim().is_empty() {
        return Err(AppError::validacion("El nombre del bocadillo es requerido"));
    }
    if !cantidad_receta.is_finite() || cantidad_receta <= 0.0 {
        return Err(AppError::validacion("La receta debe rendir al menos una pieza"));
    }

    let mapa = mapa_insumos(insumos);
    for linea in bocadillo_insumos {
        if linea.cantidad < 0.0 {
            return Err(AppError::validacion("Las cantidades de la receta no pueden ser negativas"));
        }
        let insumo = mapa
            .get(linea.insumo_id.as_str())
            .ok_or_else(|| AppError::no_encontrado("Insumo", linea.insumo_id.clone()))?;
        if !unidades_compatibles(&insumo.unidad_medida).contains(&linea.unidad) {
            return Err(AppError::validacion(format!(
                "La unidad '{}' no es compatible con '{}' ({})",
                linea.unidad, insumo.unidad_medida, insumo.nombre
            )));
        }
    }
    Ok(())
}

pub fn listar_bocadillos(db: &Database) -> Result<Vec<Bocadillo>, AppError> {
    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    bocadillos.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
    Ok(bocadillos)
}

pub fn obtener_bocadillo(db: &Database, id: &str) -> Result<Bocadillo, AppError> {
    db.leer_lista::<Bocadillo>(CLAVE_BOCADILLOS)?
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| AppError::no_encontrado("Bocadillo", id))
}

pub fn crear_bocadillo(db: &Database, bocadillo: NuevoBocadillo) -> Result<Bocadillo, AppError> {
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    validar(&bocadillo.nombre, &bocadillo.insumos, bocadillo.cantidad_receta, &insumos)?;

    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let nuevo = bocadillo.con_id(generar_id());
    bocadillos.push(nuevo.clone());
    db.guardar(CLAVE_BOCADILLOS, &bocadillos)?;

    Ok(nuevo)
}

pub fn actualizar_bocadillo(db: &Database, bocadillo: Bocadillo) -> Result<(), AppError> {
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    validar(&bocadillo.nombre, &bocadillo.insumos, bocadillo.cantidad_receta, &insumos)?;

    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let existente = bocadillos
        .iter_mut()
        .find(|b| b.id == bocadillo.id)
        .ok_or_else(|| AppError::no_encontrado("Bocadillo", bocadillo.id.clone()))?;
    *existente = bocadillo;
    db.guardar(CLAVE_BOCADILLOS, &bocadillos)?;

    refrescar_presupuestos_abiertos(db, &bocadillos)?;
    Ok(())
}

/// Los presupuestos que lo incluían conservan el precio con que se cotizó.
pub fn eliminar_bocadillo(db: &Database, id: &str) -> Result<(), AppError> {
    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let antes = bocadillos.len();
    bocadillos.retain(|b| b.id != id);

    if bocadillos.len() == antes {
        return Err(AppError::no_encontrado("Bocadillo", id));
    }

    db.guardar(CLAVE_BOCADILLOS, &bocadillos)?;
    Ok(())
}

fn costo_de(bocadillo: &Bocadillo, insumos: &[Insumo]) -> CostoBocadillo {
    let costo = costear_receta(&bocadillo.insumos, &mapa_insumos(insumos), bocadillo.cantidad_receta);
    CostoBocadillo {
        bocadillo_id: bocadillo.id.clone(),
        nombre: bocadillo.nombre.clone(),
        costo_total: costo.costo_total,
        costo_por_unidad: costo.costo_por_unidad,
        precio_venta: bocadillo.precio_venta,
        porcentaje_ganancia: bocadillo.porcentaje_ganancia,
        venta_receta: bocadillo.precio_venta * bocadillo.cantidad_receta,
        lineas_omitidas: costo.lineas_omitidas,
    }
}

pub fn costear_bocadillo(db: &Database, id: &str) -> Result<CostoBocadillo, AppError> {
    let bocadillo = obtener_bocadillo(db, id)?;
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    Ok(costo_de(&bocadillo, &insumos))
}

pub fn listar_costos_bocadillos(db: &Database) -> Result<Vec<CostoBocadillo>, AppError> {
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    Ok(listar_bocadillos(db)?
        .iter()
        .map(|b| costo_de(b, &insumos))
        .collect())
}

fn ajustar_precio(
    db: &Database,
    id: &str,
    ajuste: impl FnOnce(&mut PrecioMargen),
) -> Result<Bocadillo, AppError> {
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let bocadillo = bocadillos
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| AppError::no_encontrado("Bocadillo", id))?;

    let costo = costear_receta(&bocadillo.insumos, &mapa_insumos(&insumos), bocadillo.cantidad_receta);
    let mut precio_margen = PrecioMargen::new(
        costo.costo_por_unidad,
        bocadillo.precio_venta,
        bocadillo.porcentaje_ganancia,
    );
    ajuste(&mut precio_margen);
    bocadillo.precio_venta = precio_margen.precio_venta;
    bocadillo.porcentaje_ganancia = precio_margen.porcentaje_ganancia;
    let actualizado = bocadillo.clone();

    db.guardar(CLAVE_BOCADILLOS, &bocadillos)?;
    refrescar_presupuestos_abiertos(db, &bocadillos)?;
    Ok(actualizado)
}

/// Precio de venta que deja `porcentaje` de ganancia sobre el costo por
/// unidad de una receta todavía no guardada.
pub fn precio_para_margen(
    db: &Database,
    lineas: &[BocadilloInsumo],
    cantidad_receta: f64,
    porcentaje: f64,
) -> Result<f64, AppError> {
    if !porcentaje.is_finite() {
        return Err(AppError::validacion("Porcentaje de ganancia inválido"));
    }
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let costo = costear_receta(lineas, &mapa_insumos(&insumos), cantidad_receta);

    let mut precio_margen = PrecioMargen::new(costo.costo_por_unidad, 0.0, 0.0);
    precio_margen.fijar_margen(porcentaje);
    Ok(precio_margen.precio_venta)
}

/// Fija el porcentaje de ganancia y deriva el precio de venta.
pub fn fijar_margen_bocadillo(db: &Database, id: &str, porcentaje: f64) -> Result<Bocadillo, AppError> {
    if !porcentaje.is_finite() {
        return Err(AppError::validacion("Porcentaje de ganancia inválido"));
    }
    ajustar_precio(db, id, |pm| pm.fijar_margen(porcentaje))
}

/// Fija el precio de venta y deriva el porcentaje de ganancia.
pub fn fijar_precio_bocadillo(db: &Database, id: &str, precio: f64) -> Result<Bocadillo, AppError> {
    if !precio.is_finite() || precio < 0.0 {
        return Err(AppError::validacion("Precio de venta inválido"));
    }
    ajustar_precio(db, id, |pm| pm.fijar_precio(precio))
}

/// Recalcula los precios tras un cambio de insumos y propaga a presupuestos abiertos.
pub(crate) fn recalcular_bocadillos(db: &Database, insumos: &[Insumo]) -> Result<usize, AppError> {
    let mut bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let cambiados = recalcular_precios_bocadillos(&mut bocadillos, insumos);

    if cambiados > 0 {
        tracing::info!(cambiados, "precios de bocadillos actualizados");
        db.guardar(CLAVE_BOCADILLOS, &bocadillos)?;
        refrescar_presupuestos_abiertos(db, &bocadillos)?;
    }
    Ok(cambiados)
}
