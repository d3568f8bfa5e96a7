use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresupuestoItem {
    pub bocadillo_id: String,
    pub cantidad: f64,
    pub precio_unitario: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presupuesto {
    pub id: String,
    pub nombre_cliente: String,
    pub items: Vec<PresupuestoItem>,
    pub total: f64,
    /// Fecha de creación en RFC 3339
    pub fecha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_vencimiento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalles_servicio: Option<String>,
    /// Registros sin la bandera se tratan como bloqueados
    #[serde(default = "bloqueado_por_defecto")]
    pub is_locked: bool,
}

fn bloqueado_por_defecto() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NuevoPresupuesto {
    pub nombre_cliente: String,
    pub items: Vec<PresupuestoItem>,
    #[serde(default)]
    pub fecha_vencimiento: Option<String>,
    #[serde(default)]
    pub detalles_servicio: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumenPresupuesto {
    pub costo_total: f64,
    pub precio_total: f64,
    pub ganancia: f64,
    pub porcentaje_ganancia: Option<f64>,
}

pub fn total_items(items: &[PresupuestoItem]) -> f64 {
    items
        .iter()
        .map(|item| item.precio_unitario * item.cantidad)
        .sum()
}
