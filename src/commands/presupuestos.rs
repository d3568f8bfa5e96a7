use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::DateTime;

use crate::costeo::margen::{margen_desde_precio, precio_desde_margen};
use crate::costeo::precios::actualizar_presupuestos_abiertos;
use crate::costeo::receta::{costear_receta, mapa_insumos};
use crate::db::{Database, CLAVE_BOCADILLOS, CLAVE_EMPRESA, CLAVE_INSUMOS, CLAVE_PRESUPUESTOS};
use crate::error::AppError;
use crate::models::{
    total_items, Bocadillo, EmpresaInfo, Insumo, NuevoPresupuesto, Presupuesto, PresupuestoItem,
    ResumenPresupuesto,
};
use crate::utils::{ahora_rfc3339, generar_id};

/// Más recientes primero
fn ordenar_por_fecha(presupuestos: &mut [Presupuesto]) {
    presupuestos.sort_by(|a, b| {
        match (
            DateTime::parse_from_rfc3339(&a.fecha),
            DateTime::parse_from_rfc3339(&b.fecha),
        ) {
            (Ok(fa), Ok(fb)) => fb.cmp(&fa),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => b.fecha.cmp(&a.fecha),
        }
    });
}

fn validar_items(items: Vec<PresupuestoItem>) -> Result<Vec<PresupuestoItem>, AppError> {
    for item in &items {
        if !item.cantidad.is_finite() || item.cantidad < 0.0 {
            return Err(AppError::validacion("Las cantidades no pueden ser negativas"));
        }
        if !item.precio_unitario.is_finite() {
            return Err(AppError::validacion("Precio unitario inválido"));
        }
    }
    Ok(items.into_iter().filter(|item| item.cantidad > 0.0).collect())
}

pub fn listar_presupuestos(db: &Database) -> Result<Vec<Presupuesto>, AppError> {
    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    ordenar_por_fecha(&mut presupuestos);
    Ok(presupuestos)
}

pub fn obtener_presupuesto(db: &Database, id: &str) -> Result<Presupuesto, AppError> {
    db.leer_lista::<Presupuesto>(CLAVE_PRESUPUESTOS)?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::no_encontrado("Presupuesto", id))
}

/// Los presupuestos nuevos nacen bloqueados y con la fecha actual.
pub fn crear_presupuesto(db: &Database, presupuesto: NuevoPresupuesto) -> Result<Presupuesto, AppError> {
    if presupuesto.nombre_cliente.trim().is_empty() {
        return Err(AppError::validacion("El nombre del cliente es requerido"));
    }
    let items = validar_items(presupuesto.items)?;

    let detalles_servicio = match presupuesto.detalles_servicio {
        Some(detalles) => Some(detalles),
        None => db
            .leer::<Option<EmpresaInfo>>(CLAVE_EMPRESA)?
            .flatten()
            .map(|empresa| empresa.detalles_servicio)
            .filter(|detalles| !detalles.is_empty()),
    };

    let nuevo = Presupuesto {
        id: generar_id(),
        nombre_cliente: presupuesto.nombre_cliente,
        total: total_items(&items),
        items,
        fecha: ahora_rfc3339(),
        fecha_vencimiento: presupuesto.fecha_vencimiento,
        detalles_servicio,
        is_locked: true,
    };

    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    presupuestos.insert(0, nuevo.clone());
    ordenar_por_fecha(&mut presupuestos);
    db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;

    Ok(nuevo)
}

/// Reemplaza cliente, items, vencimiento y detalles; conserva id, fecha y bloqueo.
pub fn actualizar_presupuesto(db: &Database, presupuesto: Presupuesto) -> Result<Presupuesto, AppError> {
    if presupuesto.nombre_cliente.trim().is_empty() {
        return Err(AppError::validacion("El nombre del cliente es requerido"));
    }
    let items = validar_items(presupuesto.items)?;

    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    let existente = presupuestos
        .iter_mut()
        .find(|p| p.id == presupuesto.id)
        .ok_or_else(|| AppError::no_encontrado("Presupuesto", presupuesto.id.clone()))?;

    existente.nombre_cliente = presupuesto.nombre_cliente;
    existente.total = total_items(&items);
    existente.items = items;
    existente.fecha_vencimiento = presupuesto.fecha_vencimiento;
    existente.detalles_servicio = presupuesto.detalles_servicio;
    let actualizado = existente.clone();

    db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;
    Ok(actualizado)
}

pub fn eliminar_presupuesto(db: &Database, id: &str) -> Result<(), AppError> {
    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    let antes = presupuestos.len();
    presupuestos.retain(|p| p.id != id);

    if presupuestos.len() == antes {
        return Err(AppError::no_encontrado("Presupuesto", id));
    }

    db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;
    Ok(())
}

/// Copia bloqueada con id y fecha nuevos, al inicio de la lista.
pub fn duplicar_presupuesto(db: &Database, id: &str) -> Result<Presupuesto, AppError> {
    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    let original = presupuestos
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::no_encontrado("Presupuesto", id))?;

    let copia = Presupuesto {
        id: generar_id(),
        nombre_cliente: format!("{} (Copia)", original.nombre_cliente),
        fecha: ahora_rfc3339(),
        is_locked: true,
        ..original.clone()
    };

    presupuestos.insert(0, copia.clone());
    db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;
    Ok(copia)
}

/// Bloquea o desbloquea. Al desbloquear, los precios se ponen al día de inmediato.
/// Retorna el nuevo estado de bloqueo.
pub fn alternar_bloqueo(db: &Database, id: &str) -> Result<bool, AppError> {
    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    let presupuesto = presupuestos
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::no_encontrado("Presupuesto", id))?;

    presupuesto.is_locked = !presupuesto.is_locked;
    let bloqueado = presupuesto.is_locked;

    if !bloqueado {
        let bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
        actualizar_presupuestos_abiertos(&mut presupuestos, &bocadillos);
    }

    db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;
    Ok(bloqueado)
}

/// Costo unitario de cada bocadillo según los insumos actuales
fn costos_unitarios(db: &Database) -> Result<HashMap<String, f64>, AppError> {
    let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS)?;
    let bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS)?;
    let mapa = mapa_insumos(&insumos);

    Ok(bocadillos
        .iter()
        .map(|b| {
            let costo = costear_receta(&b.insumos, &mapa, b.cantidad_receta);
            (b.id.clone(), costo.costo_por_unidad)
        })
        .collect())
}

/// Costo de producción contra precio de venta del presupuesto.
pub fn resumen_presupuesto(db: &Database, id: &str) -> Result<ResumenPresupuesto, AppError> {
    let presupuesto = obtener_presupuesto(db, id)?;
    let costos = costos_unitarios(db)?;

    let costo_total: f64 = presupuesto
        .items
        .iter()
        .filter_map(|item| costos.get(&item.bocadillo_id).map(|c| c * item.cantidad))
        .sum();

    Ok(ResumenPresupuesto {
        costo_total,
        precio_total: presupuesto.total,
        ganancia: presupuesto.total - costo_total,
        porcentaje_ganancia: margen_desde_precio(presupuesto.total, costo_total),
    })
}

/// Precio unitario de un item cotizado con un margen propio.
pub fn precio_item_con_margen(db: &Database, bocadillo_id: &str, margen: f64) -> Result<f64, AppError> {
    let costos = costos_unitarios(db)?;
    let costo = costos
        .get(bocadillo_id)
        .ok_or_else(|| AppError::no_encontrado("Bocadillo", bocadillo_id))?;
    Ok(precio_desde_margen(*costo, margen))
}

/// Pone al día los presupuestos desbloqueados con los precios de `bocadillos`.
pub(crate) fn refrescar_presupuestos_abiertos(
    db: &Database,
    bocadillos: &[Bocadillo],
) -> Result<usize, AppError> {
    let mut presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS)?;
    let cambiados = actualizar_presupuestos_abiertos(&mut presupuestos, bocadillos);

    if cambiados > 0 {
        tracing::info!(cambiados, "presupuestos abiertos actualizados");
        db.guardar(CLAVE_PRESUPUESTOS, &presupuestos)?;
    }
    Ok(cambiados)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(bocadillo_id: &str, cantidad: f64, precio: f64) -> PresupuestoItem {
        PresupuestoItem {
            bocadillo_id: bocadillo_id.to_string(),
            cantidad,
            precio_unitario: precio,
        }
    }

    fn nuevo(cliente: &str, items: Vec<PresupuestoItem>) -> NuevoPresupuesto {
        NuevoPresupuesto {
            nombre_cliente: cliente.to_string(),
            items,
            fecha_vencimiento: Some("2030-12-31".to_string()),
            detalles_servicio: None,
        }
    }

    #[test]
    fn test_crear_bloqueado_con_total() {
        let db = Database::en_memoria().unwrap();
        let creado = crear_presupuesto(
            &db,
            nuevo("Boda García", vec![item("boc1", 10.0, 5.70), item("boc2", 0.0, 13.90)]),
        )
        .unwrap();

        assert!(creado.is_locked);
        assert_eq!(creado.items.len(), 1);
        assert!((creado.total - 57.0).abs() < 1e-9);
        assert_eq!(
            creado.detalles_servicio.as_deref(),
            Some("Gracias por su preferencia. Los precios están sujetos a cambios sin previo aviso.")
        );
        assert_eq!(listar_presupuestos(&db).unwrap()[0].id, creado.id);
    }

    #[test]
    fn test_crear_con_empresa_nula() {
        let db = Database::en_memoria().unwrap();
        db.guardar_texto(CLAVE_EMPRESA, "null").unwrap();

        let creado = crear_presupuesto(&db, nuevo("Boda García", vec![item("boc1", 10.0, 5.70)])).unwrap();
        assert!(creado.detalles_servicio.is_none());
        assert!(creado.is_locked);
    }

    #[test]
    fn test_cliente_requerido() {
        let db = Database::en_memoria().unwrap();
        assert!(crear_presupuesto(&db, nuevo("", vec![])).is_err());
    }

    #[test]
    fn test_listar_mas_recientes_primero() {
        let db = Database::en_memoria().unwrap();
        let ids: Vec<String> = listar_presupuestos(&db).unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["pre1", "pre2"]);
    }

    #[test]
    fn test_actualizar_conserva_fecha_y_bloqueo() {
        let db = Database::en_memoria().unwrap();
        let original = obtener_presupuesto(&db, "pre1").unwrap();
        let mut editado = original.clone();
        editado.nombre_cliente = "Fiesta Pérez".to_string();
        editado.items = vec![item("boc1", 2.0, 6.0)];
        editado.is_locked = false;
        editado.fecha = "2000-01-01T00:00:00Z".to_string();

        let guardado = actualizar_presupuesto(&db, editado).unwrap();
        assert_eq!(guardado.fecha, original.fecha);
        assert!(guardado.is_locked);
        assert_eq!(guardado.total, 12.0);
    }

    #[test]
    fn test_duplicar() {
        let db = Database::en_memoria().unwrap();
        let copia = duplicar_presupuesto(&db, "pre2").unwrap();
        assert_ne!(copia.id, "pre2");
        assert_eq!(copia.nombre_cliente, "Reunión Corporativa Acme (Copia)");
        assert!(copia.is_locked);
        assert_eq!(copia.total, 570.0);
        assert_eq!(listar_presupuestos(&db).unwrap().len(), 3);
    }

    #[test]
    fn test_alternar_bloqueo_actualiza_al_abrir() {
        let db = Database::en_memoria().unwrap();
        // pre1 está bloqueado: el nuevo precio no lo alcanza hasta abrirlo
        crate::commands::bocadillos::fijar_precio_bocadillo(&db, "boc2", 15.0).unwrap();
        assert_eq!(obtener_presupuesto(&db, "pre1").unwrap().items[1].precio_unitario, 13.90);

        assert!(!alternar_bloqueo(&db, "pre1").unwrap());
        let abierto = obtener_presupuesto(&db, "pre1").unwrap();
        assert_eq!(abierto.items[1].precio_unitario, 15.0);
        assert!((abierto.total - (48.0 * 5.70 + 12.0 * 15.0)).abs() < 1e-9);

        assert!(alternar_bloqueo(&db, "pre1").unwrap());
    }

    #[test]
    fn test_resumen() {
        let db = Database::en_memoria().unwrap();
        let resumen = resumen_presupuesto(&db, "pre2").unwrap();
        let costo_unitario = 54.75 / 24.0;
        assert!((resumen.costo_total - 100.0 * costo_unitario).abs() < 1e-6);
        assert_eq!(resumen.precio_total, 570.0);
        assert!((resumen.ganancia - (570.0 - 100.0 * costo_unitario)).abs() < 1e-6);
        assert!(resumen.porcentaje_ganancia.unwrap() > 149.0);
    }

    #[test]
    fn test_precio_item_con_margen() {
        let db = Database::en_memoria().unwrap();
        let precio = precio_item_con_margen(&db, "boc1", 0.0).unwrap();
        assert!((precio - 54.75 / 24.0).abs() < 1e-9);
        assert!(precio_item_con_margen(&db, "nada", 10.0).is_err());
    }
}
