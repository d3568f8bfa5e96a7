use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insumo {
    pub id: String,
    pub nombre: String,
    pub proveedor_id: String,
    pub costo: f64,
    /// Cantidad a la que aplica el costo (1 kg, 500 g...)
    pub cantidad_medida: f64,
    pub unidad_medida: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NuevoInsumo {
    pub nombre: String,
    pub proveedor_id: String,
    pub costo: f64,
    pub cantidad_medida: f64,
    pub unidad_medida: String,
}

impl NuevoInsumo {
    pub fn con_id(self, id: String) -> Insumo {
        Insumo {
            id,
            nombre: self.nombre,
            proveedor_id: self.proveedor_id,
            costo: self.costo,
            cantidad_medida: self.cantidad_medida,
            unidad_medida: self.unidad_medida,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgruparPor {
    Proveedor,
    Nombre,
}
