//! Migraciones de una sola vez sobre los documentos JSON guardados.
//!
//! Cada migración se identifica por una bandera en el almacén. Si la bandera
//! existe la migración no se vuelve a ejecutar; si falla, el error se registra
//! y la bandera se escribe igual para no repetir una migración rota.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use super::{Database, CLAVE_BOCADILLOS, CLAVE_EMPRESA, CLAVE_INSUMOS, CLAVE_PRESUPUESTOS, CLAVE_PROVEEDORES};
use crate::costeo::margen::margen_desde_precio;
use crate::costeo::receta::{costear_receta, mapa_insumos};
use crate::error::AppError;
use crate::models::{BocadilloInsumo, Insumo};

pub struct Migracion {
    pub clave: &'static str,
    aplicar: fn(&Database) -> Result<bool, AppError>,
}

/// En orden de aplicación
pub const MIGRACIONES: &[Migracion] = &[
    Migracion {
        clave: "data-migration-units-v1",
        aplicar: migrar_unidades,
    },
    Migracion {
        clave: "data-migration-recipe-yield-v1",
        aplicar: migrar_rendimiento_receta,
    },
    Migracion {
        clave: "data-migration-profit-percentage-v1",
        aplicar: migrar_porcentaje_ganancia,
    },
    Migracion {
        clave: "data-migration-presupuesto-locked-v1",
        aplicar: migrar_presupuestos_bloqueados,
    },
    Migracion {
        clave: "data-migration-empresa-logo-v1",
        aplicar: migrar_logo_empresa,
    },
    Migracion {
        clave: "data-migration-proveedor-ubicacion-v1",
        aplicar: migrar_ubicacion_proveedores,
    },
];

/// Ejecuta las migraciones pendientes. Retorna las claves de las que modificaron datos.
pub fn ejecutar_migraciones(db: &Database) -> Result<Vec<&'static str>, AppError> {
    let mut aplicadas = Vec::new();

    for migracion in MIGRACIONES {
        if db.tiene_clave(migracion.clave)? {
            continue;
        }

        match (migracion.aplicar)(db) {
            Ok(true) => {
                tracing::info!(migracion = migracion.clave, "datos migrados");
                aplicadas.push(migracion.clave);
            }
            Ok(false) => {
                tracing::debug!(migracion = migracion.clave, "sin datos que migrar");
            }
            Err(e) => {
                tracing::error!(migracion = migracion.clave, error = %e, "falló la migración");
            }
        }

        db.guardar_texto(migracion.clave, "true")?;
    }

    Ok(aplicadas)
}

/// Lista JSON guardada en `clave`; vacía si no existe o es `null`
fn leer_registros(db: &Database, clave: &str) -> Result<Vec<Value>, AppError> {
    match db.leer_valor(clave)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(registros)) => Ok(registros),
        Some(_) => Err(AppError::validacion(format!("'{}' no es una lista", clave))),
    }
}

fn como_objeto(registro: &mut Value) -> Result<&mut Map<String, Value>, AppError> {
    registro
        .as_object_mut()
        .ok_or_else(|| AppError::validacion("registro que no es un objeto"))
}

/// Agrega `campo` con `valor` a los registros que no lo tienen
fn completar_campo(db: &Database, clave: &str, campo: &str, valor: Value) -> Result<bool, AppError> {
    let mut registros = leer_registros(db, clave)?;
    let mut cambio = false;

    for registro in registros.iter_mut() {
        let objeto = como_objeto(registro)?;
        if !objeto.contains_key(campo) {
            objeto.insert(campo.to_string(), valor.clone());
            cambio = true;
        }
    }

    if cambio {
        db.guardar_valor(clave, &Value::Array(registros))?;
    }
    Ok(cambio)
}

/// Insumos con `unidad` pasan a `cantidadMedida` + `unidadMedida`; las líneas
/// de receta sin unidad toman la unidad de compra del insumo, aunque los
/// insumos ya estuvieran migrados.
fn migrar_unidades(db: &Database) -> Result<bool, AppError> {
    let mut insumos = leer_registros(db, CLAVE_INSUMOS)?;
    let mut cambio = false;

    for insumo in insumos.iter_mut() {
        let objeto = como_objeto(insumo)?;
        if let Some(unidad) = objeto.remove("unidad") {
            objeto.insert("cantidadMedida".to_string(), json!(1));
            objeto.insert("unidadMedida".to_string(), unidad);
            cambio = true;
        }
    }

    if cambio {
        db.guardar_valor(CLAVE_INSUMOS, &Value::Array(insumos.clone()))?;
    }

    let unidades: HashMap<String, Value> = insumos
        .iter()
        .filter_map(|i| {
            let id = i.get("id")?.as_str()?.to_string();
            let unidad = i.get("unidadMedida")?.clone();
            Some((id, unidad))
        })
        .collect();

    let mut bocadillos = leer_registros(db, CLAVE_BOCADILLOS)?;
    let mut bocadillos_cambiados = false;

    for bocadillo in bocadillos.iter_mut() {
        let objeto = como_objeto(bocadillo)?;
        let Some(Value::Array(lineas)) = objeto.get_mut("insumos") else {
            continue;
        };
        for linea in lineas.iter_mut() {
            let linea = como_objeto(linea)?;
            if linea.contains_key("unidad") {
                continue;
            }
            let unidad = linea
                .get("insumoId")
                .and_then(Value::as_str)
                .and_then(|id| unidades.get(id))
                .cloned()
                .unwrap_or_else(|| json!("pza"));
            linea.insert("unidad".to_string(), unidad);
            bocadillos_cambiados = true;
        }
    }

    if bocadillos_cambiados {
        db.guardar_valor(CLAVE_BOCADILLOS, &Value::Array(bocadillos))?;
    }

    Ok(cambio || bocadillos_cambiados)
}

fn migrar_rendimiento_receta(db: &Database) -> Result<bool, AppError> {
    completar_campo(db, CLAVE_BOCADILLOS, "cantidadReceta", json!(1))
}

/// Líneas de receta que se pueden costear; las que no tienen unidad o no
/// tienen la forma esperada se omiten.
fn lineas_costeables(bocadillo: &str, valor: Option<&Value>) -> Vec<BocadilloInsumo> {
    let Some(Value::Array(lineas)) = valor else {
        return Vec::new();
    };

    lineas
        .iter()
        .filter_map(|linea| {
            if linea.get("unidad").and_then(Value::as_str).is_none() {
                tracing::warn!(bocadillo, "línea de receta sin unidad omitida");
                return None;
            }
            match serde_json::from_value::<BocadilloInsumo>(linea.clone()) {
                Ok(linea) => Some(linea),
                Err(e) => {
                    tracing::warn!(bocadillo, error = %e, "línea de receta inválida omitida");
                    None
                }
            }
        })
        .collect()
}

/// Calcula el porcentaje de ganancia implícito en el precio de venta guardado.
fn migrar_porcentaje_ganancia(db: &Database) -> Result<bool, AppError> {
    let mut bocadillos = leer_registros(db, CLAVE_BOCADILLOS)?;
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let mapa = mapa_insumos(&insumos);
    let mut cambio = false;

    for bocadillo in bocadillos.iter_mut() {
        let objeto = como_objeto(bocadillo)?;
        if objeto.contains_key("porcentajeGanancia") {
            continue;
        }

        let nombre = objeto
            .get("nombre")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let lineas = lineas_costeables(&nombre, objeto.get("insumos"));
        let cantidad_receta = objeto
            .get("cantidadReceta")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let porcentaje = match objeto.get("precioVenta").and_then(Value::as_f64) {
            Some(precio_venta) => {
                let costo = costear_receta(&lineas, &mapa, cantidad_receta);
                margen_desde_precio(precio_venta, costo.costo_por_unidad).unwrap_or(0.0)
            }
            None => 0.0,
        };

        objeto.insert("porcentajeGanancia".to_string(), json!(porcentaje));
        cambio = true;
    }

    if cambio {
        db.guardar_valor(CLAVE_BOCADILLOS, &Value::Array(bocadillos))?;
    }
    Ok(cambio)
}

fn migrar_presupuestos_bloqueados(db: &Database) -> Result<bool, AppError> {
    completar_campo(db, CLAVE_PRESUPUESTOS, "isLocked", json!(true))
}

fn migrar_logo_empresa(db: &Database) -> Result<bool, AppError> {
    let Some(mut empresa) = db.leer_valor(CLAVE_EMPRESA)? else {
        return Ok(false);
    };
    let Some(objeto) = empresa.as_object_mut() else {
        return Ok(false);
    };
    if objeto.contains_key("logoUrl") {
        return Ok(false);
    }
    objeto.insert("logoUrl".to_string(), json!(""));
    db.guardar_valor(CLAVE_EMPRESA, &empresa)?;
    Ok(true)
}

fn migrar_ubicacion_proveedores(db: &Database) -> Result<bool, AppError> {
    completar_campo(db, CLAVE_PROVEEDORES, "ubicacionUrl", json!(""))
}
