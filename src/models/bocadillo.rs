use serde::{Deserialize, Serialize};

/// Línea de receta: cuánto de un insumo usa el bocadillo y en qué unidad.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BocadilloInsumo {
    pub insumo_id: String,
    pub cantidad: f64,
    #[serde(default)]
    pub unidad: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bocadillo {
    pub id: String,
    pub nombre: String,
    /// Precio por unidad
    #[serde(default)]
    pub precio_venta: f64,
    #[serde(default)]
    pub insumos: Vec<BocadilloInsumo>,
    /// Cuántas piezas rinde la receta
    #[serde(default = "rendimiento_por_defecto")]
    pub cantidad_receta: f64,
    #[serde(default)]
    pub porcentaje_ganancia: f64,
}

fn rendimiento_por_defecto() -> f64 {
    1.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NuevoBocadillo {
    pub nombre: String,
    pub precio_venta: f64,
    pub insumos: Vec<BocadilloInsumo>,
    pub cantidad_receta: f64,
    pub porcentaje_ganancia: f64,
}

impl NuevoBocadillo {
    pub fn con_id(self, id: String) -> Bocadillo {
        Bocadillo {
            id,
            nombre: self.nombre,
            precio_venta: self.precio_venta,
            insumos: self.insumos,
            cantidad_receta: self.cantidad_receta,
            porcentaje_ganancia: self.porcentaje_ganancia,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostoBocadillo {
    pub bocadillo_id: String,
    pub nombre: String,
    pub costo_total: f64,
    pub costo_por_unidad: f64,
    pub precio_venta: f64,
    pub porcentaje_ganancia: f64,
    /// Precio de venta de toda la receta (precio por unidad × rendimiento)
    pub venta_receta: f64,
    pub lineas_omitidas: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registro_antiguo_usa_valores_por_defecto() {
        let bocadillo: Bocadillo = serde_json::from_str(
            r#"{"id": "b1", "nombre": "Pan", "insumos": [{"insumoId": "i1", "cantidad": 2}]}"#,
        )
        .unwrap();
        assert_eq!(bocadillo.precio_venta, 0.0);
        assert_eq!(bocadillo.cantidad_receta, 1.0);
        assert_eq!(bocadillo.porcentaje_ganancia, 0.0);
        assert_eq!(bocadillo.insumos[0].unidad, "");
    }
}
