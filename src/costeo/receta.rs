use std::collections::HashMap;

use serde::Serialize;

use super::unidades::convertir;
use crate::models::{BocadilloInsumo, Insumo};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CostoReceta {
    pub costo_total: f64,
    pub costo_por_unidad: f64,
    /// Líneas que no aportaron costo (insumo inexistente o unidades incompatibles)
    pub lineas_omitidas: usize,
}

pub fn mapa_insumos(insumos: &[Insumo]) -> HashMap<&str, &Insumo> {
    insumos.iter().map(|i| (i.id.as_str(), i)).collect()
}

/// Costo de una línea expresado en la unidad de compra del insumo.
/// `None` si la línea no se puede costear.
pub fn costo_linea(linea: &BocadilloInsumo, insumo: &Insumo) -> Option<f64> {
    if insumo.cantidad_medida == 0.0 {
        return None;
    }
    let costo_por_medida = insumo.costo / insumo.cantidad_medida;

    match convertir(linea.cantidad, &linea.unidad, &insumo.unidad_medida) {
        Ok(cantidad) => Some(cantidad * costo_por_medida),
        Err(e) => {
            tracing::warn!(insumo = %insumo.nombre, error = %e, "línea de receta omitida");
            None
        }
    }
}

/// Costo por unidad producida; cero si el rendimiento no es positivo.
pub fn costo_por_unidad(costo_total: f64, cantidad_receta: f64) -> f64 {
    if cantidad_receta > 0.0 {
        costo_total / cantidad_receta
    } else {
        0.0
    }
}

pub fn costear_receta(
    lineas: &[BocadilloInsumo],
    insumos: &HashMap<&str, &Insumo>,
    cantidad_receta: f64,
) -> CostoReceta {
    let mut costo_total = 0.0;
    let mut lineas_omitidas = 0;

    for linea in lineas {
        let costo = insumos
            .get(linea.insumo_id.as_str())
            .and_then(|insumo| costo_linea(linea, insumo));

        match costo {
            Some(c) => costo_total += c,
            None => lineas_omitidas += 1,
        }
    }

    CostoReceta {
        costo_total,
        costo_por_unidad: costo_por_unidad(costo_total, cantidad_receta),
        lineas_omitidas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insumo(id: &str, costo: f64, cantidad: f64, unidad: &str) -> Insumo {
        Insumo {
            id: id.to_string(),
            nombre: id.to_uppercase(),
            proveedor_id: "prov".to_string(),
            costo,
            cantidad_medida: cantidad,
            unidad_medida: unidad.to_string(),
        }
    }

    fn linea(id: &str, cantidad: f64, unidad: &str) -> BocadilloInsumo {
        BocadilloInsumo {
            insumo_id: id.to_string(),
            cantidad,
            unidad: unidad.to_string(),
        }
    }

    fn cerca(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_suma_de_lineas() {
        let insumos = vec![
            insumo("harina", 20.0, 1.0, "kg"),
            insumo("chispas", 80.0, 500.0, "g"),
            insumo("huevo", 3.0, 1.0, "pza"),
            insumo("leche", 25.0, 1.0, "L"),
        ];
        let mapa = mapa_insumos(&insumos);
        let lineas = vec![
            linea("harina", 250.0, "g"),
            linea("chispas", 150.0, "g"),
            linea("huevo", 2.0, "pza"),
            linea("leche", 120.0, "ml"),
        ];

        let esperado: f64 = lineas
            .iter()
            .map(|l| costo_linea(l, mapa[l.insumo_id.as_str()]).unwrap())
            .sum();
        let costo = costear_receta(&lineas, &mapa, 1.0);

        assert!(cerca(costo.costo_total, esperado));
        assert!(cerca(costo.costo_total, 5.0 + 24.0 + 6.0 + 3.0));
        assert_eq!(costo.lineas_omitidas, 0);
    }

    #[test]
    fn test_rendimiento_divide_costo() {
        let insumos = vec![insumo("harina", 20.0, 1.0, "kg")];
        let mapa = mapa_insumos(&insumos);
        let lineas = vec![linea("harina", 600.0, "g")];

        let uno = costear_receta(&lineas, &mapa, 1.0);
        let doce = costear_receta(&lineas, &mapa, 12.0);

        assert!(cerca(uno.costo_total, doce.costo_total));
        assert!(cerca(doce.costo_por_unidad, uno.costo_por_unidad / 12.0));
    }

    #[test]
    fn test_rendimiento_cero() {
        let insumos = vec![insumo("harina", 20.0, 1.0, "kg")];
        let mapa = mapa_insumos(&insumos);
        let costo = costear_receta(&[linea("harina", 1.0, "kg")], &mapa, 0.0);
        assert!(cerca(costo.costo_total, 20.0));
        assert_eq!(costo.costo_por_unidad, 0.0);
    }

    #[test]
    fn test_lineas_incompatibles_se_omiten() {
        let insumos = vec![
            insumo("harina", 20.0, 1.0, "kg"),
            insumo("leche", 25.0, 1.0, "L"),
            insumo("gratis", 10.0, 0.0, "g"),
        ];
        let mapa = mapa_insumos(&insumos);
        let lineas = vec![
            linea("harina", 500.0, "g"),
            linea("leche", 100.0, "g"),
            linea("gratis", 5.0, "g"),
            linea("borrado", 1.0, "pza"),
        ];

        let costo = costear_receta(&lineas, &mapa, 2.0);
        assert!(cerca(costo.costo_total, 10.0));
        assert!(cerca(costo.costo_por_unidad, 5.0));
        assert_eq!(costo.lineas_omitidas, 3);
    }
}
