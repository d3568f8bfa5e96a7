//! Propagación de cambios de costo: insumos → bocadillos → presupuestos abiertos.

use std::collections::HashMap;

use super::margen::precio_desde_margen;
use super::receta::{costear_receta, mapa_insumos};
use crate::models::{total_items, Bocadillo, Insumo, Presupuesto};
use crate::utils::redondear_centavos;

const TOLERANCIA: f64 = 0.001;

/// Recalcula el precio de cada bocadillo conservando su porcentaje de ganancia.
/// Retorna cuántos bocadillos cambiaron.
pub fn recalcular_precios_bocadillos(bocadillos: &mut [Bocadillo], insumos: &[Insumo]) -> usize {
    let mapa = mapa_insumos(insumos);
    let mut cambiados = 0;

    for bocadillo in bocadillos.iter_mut() {
        let costo = costear_receta(&bocadillo.insumos, &mapa, bocadillo.cantidad_receta);
        let nuevo_precio =
            redondear_centavos(precio_desde_margen(costo.costo_por_unidad, bocadillo.porcentaje_ganancia));

        if (bocadillo.precio_venta - nuevo_precio).abs() > TOLERANCIA {
            tracing::debug!(
                bocadillo = %bocadillo.nombre,
                anterior = bocadillo.precio_venta,
                nuevo = nuevo_precio,
                "precio recalculado"
            );
            bocadillo.precio_venta = nuevo_precio;
            cambiados += 1;
        }
    }

    cambiados
}

/// Actualiza precios y totales de los presupuestos no bloqueados.
/// Retorna cuántos presupuestos cambiaron.
pub fn actualizar_presupuestos_abiertos(
    presupuestos: &mut [Presupuesto],
    bocadillos: &[Bocadillo],
) -> usize {
    let mapa: HashMap<&str, &Bocadillo> = bocadillos.iter().map(|b| (b.id.as_str(), b)).collect();
    let mut cambiados = 0;

    for presupuesto in presupuestos.iter_mut().filter(|p| !p.is_locked) {
        let mut cambio = false;

        for item in presupuesto.items.iter_mut() {
            if let Some(bocadillo) = mapa.get(item.bocadillo_id.as_str()) {
                if item.precio_unitario != bocadillo.precio_venta {
                    item.precio_unitario = bocadillo.precio_venta;
                    cambio = true;
                }
            }
        }

        let total = total_items(&presupuesto.items);
        if (presupuesto.total - total).abs() > TOLERANCIA {
            cambio = true;
        }

        if cambio {
            presupuesto.total = total;
            cambiados += 1;
        }
    }

    cambiados
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BocadilloInsumo, PresupuestoItem};

    fn harina(costo: f64) -> Insumo {
        Insumo {
            id: "harina".to_string(),
            nombre: "Harina".to_string(),
            proveedor_id: "prov".to_string(),
            costo,
            cantidad_medida: 1.0,
            unidad_medida: "kg".to_string(),
        }
    }

    fn galleta(precio: f64) -> Bocadillo {
        Bocadillo {
            id: "galleta".to_string(),
            nombre: "Galleta".to_string(),
            precio_venta: precio,
            insumos: vec![BocadilloInsumo {
                insumo_id: "harina".to_string(),
                cantidad: 500.0,
                unidad: "g".to_string(),
            }],
            cantidad_receta: 10.0,
            porcentaje_ganancia: 100.0,
        }
    }

    fn presupuesto(bloqueado: bool) -> Presupuesto {
        Presupuesto {
            id: "p1".to_string(),
            nombre_cliente: "Cliente".to_string(),
            items: vec![PresupuestoItem {
                bocadillo_id: "galleta".to_string(),
                cantidad: 20.0,
                precio_unitario: 2.0,
            }],
            total: 40.0,
            fecha: "2026-01-01T10:00:00+00:00".to_string(),
            fecha_vencimiento: None,
            detalles_servicio: None,
            is_locked: bloqueado,
        }
    }

    #[test]
    fn test_recalcula_conservando_margen() {
        // 500 g a 30/kg = 15, entre 10 = 1.5, +100% = 3.0
        let mut bocadillos = vec![galleta(2.0)];
        let cambiados = recalcular_precios_bocadillos(&mut bocadillos, &[harina(30.0)]);
        assert_eq!(cambiados, 1);
        assert_eq!(bocadillos[0].precio_venta, 3.0);
        assert_eq!(bocadillos[0].porcentaje_ganancia, 100.0);
    }

    #[test]
    fn test_sin_cambio_si_precio_vigente() {
        let mut bocadillos = vec![galleta(2.0)];
        assert_eq!(recalcular_precios_bocadillos(&mut bocadillos, &[harina(20.0)]), 0);
        assert_eq!(bocadillos[0].precio_venta, 2.0);
    }

    #[test]
    fn test_presupuesto_bloqueado_no_cambia() {
        let mut presupuestos = vec![presupuesto(true)];
        let original = presupuestos.clone();
        let cambiados = actualizar_presupuestos_abiertos(&mut presupuestos, &[galleta(3.0)]);
        assert_eq!(cambiados, 0);
        assert_eq!(presupuestos, original);
    }

    #[test]
    fn test_presupuesto_abierto_se_actualiza() {
        let mut presupuestos = vec![presupuesto(false)];
        let cambiados = actualizar_presupuestos_abiertos(&mut presupuestos, &[galleta(3.0)]);
        assert_eq!(cambiados, 1);
        assert_eq!(presupuestos[0].items[0].precio_unitario, 3.0);
        assert_eq!(presupuestos[0].total, 60.0);
    }

    #[test]
    fn test_bocadillo_eliminado_conserva_item() {
        let mut presupuestos = vec![presupuesto(false)];
        presupuestos[0].total = 10.0;
        let cambiados = actualizar_presupuestos_abiertos(&mut presupuestos, &[]);
        assert_eq!(cambiados, 1);
        assert_eq!(presupuestos[0].items[0].precio_unitario, 2.0);
        assert_eq!(presupuestos[0].total, 40.0);
    }
}
