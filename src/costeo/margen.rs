//! Relación entre costo, precio de venta y porcentaje de ganancia.

use serde::{Deserialize, Serialize};

use crate::utils::redondear_centavos;

/// Precio que deja `margen` por ciento de ganancia sobre `costo`.
pub fn precio_desde_margen(costo: f64, margen: f64) -> f64 {
    costo * (1.0 + margen / 100.0)
}

/// Porcentaje de ganancia de vender a `precio` algo que cuesta `costo`.
/// `None` si el costo no es positivo o el resultado no es finito.
pub fn margen_desde_precio(precio: f64, costo: f64) -> Option<f64> {
    if costo <= 0.0 {
        return None;
    }
    let margen = (precio / costo - 1.0) * 100.0;
    margen.is_finite().then_some(margen)
}

/// Precio y margen de un bocadillo, sincronizados en ambas direcciones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecioMargen {
    pub costo_por_unidad: f64,
    pub precio_venta: f64,
    pub porcentaje_ganancia: f64,
}

impl PrecioMargen {
    pub fn new(costo_por_unidad: f64, precio_venta: f64, porcentaje_ganancia: f64) -> Self {
        PrecioMargen {
            costo_por_unidad,
            precio_venta,
            porcentaje_ganancia,
        }
    }

    /// Fija el margen y recalcula el precio (redondeado a centavos).
    pub fn fijar_margen(&mut self, porcentaje: f64) {
        self.porcentaje_ganancia = porcentaje;
        if self.costo_por_unidad >= 0.0 {
            self.precio_venta =
                redondear_centavos(precio_desde_margen(self.costo_por_unidad, porcentaje));
        }
    }

    /// Fija el precio y recalcula el margen (redondeado a dos decimales).
    pub fn fijar_precio(&mut self, precio: f64) {
        self.precio_venta = precio;
        self.porcentaje_ganancia = margen_desde_precio(precio, self.costo_por_unidad)
            .map(redondear_centavos)
            .unwrap_or(0.0);
    }

    /// Cambia el costo conservando el margen.
    pub fn actualizar_costo(&mut self, costo_por_unidad: f64) {
        self.costo_por_unidad = costo_por_unidad;
        let margen = self.porcentaje_ganancia;
        self.fijar_margen(margen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margen_cero_precio_igual_costo() {
        assert_eq!(precio_desde_margen(2.28, 0.0), 2.28);

        let mut pm = PrecioMargen::new(3.5, 10.0, 150.0);
        pm.fijar_margen(0.0);
        assert_eq!(pm.precio_venta, 3.5);
    }

    #[test]
    fn test_precio_desde_margen() {
        assert_eq!(precio_desde_margen(4.0, 150.0), 10.0);
        assert_eq!(precio_desde_margen(4.0, -50.0), 2.0);
    }

    #[test]
    fn test_margen_desde_precio() {
        assert_eq!(margen_desde_precio(10.0, 4.0), Some(150.0));
        assert_eq!(margen_desde_precio(2.0, 4.0), Some(-50.0));
        assert_eq!(margen_desde_precio(10.0, 0.0), None);
        assert_eq!(margen_desde_precio(10.0, -1.0), None);
    }

    #[test]
    fn test_ida_y_vuelta() {
        let mut pm = PrecioMargen::new(2.28125, 0.0, 0.0);
        pm.fijar_margen(150.0);
        assert_eq!(pm.precio_venta, 5.7);

        pm.fijar_precio(6.0);
        assert_eq!(pm.porcentaje_ganancia, 163.01);
    }

    #[test]
    fn test_precio_sin_costo_limpia_margen() {
        let mut pm = PrecioMargen::new(0.0, 0.0, 40.0);
        pm.fijar_precio(12.0);
        assert_eq!(pm.precio_venta, 12.0);
        assert_eq!(pm.porcentaje_ganancia, 0.0);
    }

    #[test]
    fn test_actualizar_costo_conserva_margen() {
        let mut pm = PrecioMargen::new(2.0, 4.0, 100.0);
        pm.actualizar_costo(3.0);
        assert_eq!(pm.porcentaje_ganancia, 100.0);
        assert_eq!(pm.precio_venta, 6.0);
    }
}
