//! Conversión de unidades de peso y volumen.
//!
//! Cada unidad conocida tiene un tipo y un factor respecto a la unidad base
//! de ese tipo (gramo para peso, mililitro para volumen). Las unidades de
//! conteo (`pza`, `unidad`...) no están en la tabla: solo se "convierten" a sí
//! mismas.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUnidad {
    Peso,
    Volumen,
}

/// (unidad, tipo, factor respecto a la base)
const UNIDADES: &[(&str, TipoUnidad, f64)] = &[
    ("kg", TipoUnidad::Peso, 1000.0),
    ("g", TipoUnidad::Peso, 1.0),
    ("mg", TipoUnidad::Peso, 0.001),
    ("L", TipoUnidad::Volumen, 1000.0),
    ("ml", TipoUnidad::Volumen, 1.0),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorConversion {
    #[error("unidad desconocida: {0}")]
    UnidadDesconocida(String),

    #[error("no se puede convertir {desde} a {hasta}")]
    TiposIncompatibles { desde: String, hasta: String },
}

fn buscar(unidad: &str) -> Option<(TipoUnidad, f64)> {
    UNIDADES
        .iter()
        .find(|(nombre, _, _)| *nombre == unidad)
        .map(|(_, tipo, factor)| (*tipo, *factor))
}

pub fn tipo_unidad(unidad: &str) -> Option<TipoUnidad> {
    buscar(unidad).map(|(tipo, _)| tipo)
}

/// Convierte `valor` de la unidad `desde` a la unidad `hasta`.
pub fn convertir(valor: f64, desde: &str, hasta: &str) -> Result<f64, ErrorConversion> {
    if desde == hasta {
        return Ok(valor);
    }

    let (tipo_desde, factor_desde) =
        buscar(desde).ok_or_else(|| ErrorConversion::UnidadDesconocida(desde.to_string()))?;
    let (tipo_hasta, factor_hasta) =
        buscar(hasta).ok_or_else(|| ErrorConversion::UnidadDesconocida(hasta.to_string()))?;

    if tipo_desde != tipo_hasta {
        return Err(ErrorConversion::TiposIncompatibles {
            desde: desde.to_string(),
            hasta: hasta.to_string(),
        });
    }

    Ok(valor * factor_desde / factor_hasta)
}

/// Unidades en las que se puede expresar una cantidad de un insumo comprado en `unidad`.
pub fn unidades_compatibles(unidad: &str) -> Vec<String> {
    match tipo_unidad(unidad) {
        Some(tipo) => UNIDADES
            .iter()
            .filter(|(_, t, _)| *t == tipo)
            .map(|(nombre, _, _)| nombre.to_string())
            .collect(),
        None => vec![unidad.to_string()],
    }
}
