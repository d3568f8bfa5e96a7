//! Datos de ejemplo que se cargan solo cuando el almacén no tiene la clave.

use super::{Database, CLAVE_BOCADILLOS, CLAVE_EMPRESA, CLAVE_INSUMOS, CLAVE_PRESUPUESTOS, CLAVE_PROVEEDORES};
use crate::error::AppError;
use crate::models::{
    Bocadillo, BocadilloInsumo, EmpresaInfo, Insumo, Presupuesto, PresupuestoItem, Proveedor,
};
use crate::utils::{ahora_rfc3339, fecha_futura};
use chrono::{Duration, Local};

pub fn sembrar_datos_iniciales(db: &Database) -> Result<(), AppError> {
    if !db.tiene_clave(CLAVE_PROVEEDORES)? {
        db.guardar(CLAVE_PROVEEDORES, &proveedores())?;
    }
    if !db.tiene_clave(CLAVE_INSUMOS)? {
        db.guardar(CLAVE_INSUMOS, &insumos())?;
    }
    if !db.tiene_clave(CLAVE_BOCADILLOS)? {
        db.guardar(CLAVE_BOCADILLOS, &bocadillos())?;
    }
    if !db.tiene_clave(CLAVE_PRESUPUESTOS)? {
        db.guardar(CLAVE_PRESUPUESTOS, &presupuestos())?;
    }
    if !db.tiene_clave(CLAVE_EMPRESA)? {
        db.guardar(CLAVE_EMPRESA, &EmpresaInfo::default())?;
    }
    Ok(())
}

fn proveedor(id: &str, nombre: &str, telefono: &str, correo: &str, ubicacion: Option<&str>) -> Proveedor {
    Proveedor {
        id: id.to_string(),
        nombre: nombre.to_string(),
        telefono: Some(telefono.to_string()),
        correo: Some(correo.to_string()),
        ubicacion_url: ubicacion.map(str::to_string),
        ..Default::default()
    }
}

fn proveedores() -> Vec<Proveedor> {
    vec![
        proveedor(
            "prov1",
            "Distribuidora La Canasta",
            "55-1234-5678",
            "ventas@lacanasta.com",
            Some("https://maps.app.goo.gl/K9g3t7Z1X6Y2Q8A8A"),
        ),
        proveedor(
            "prov2",
            "Harinas del Centro",
            "55-8765-4321",
            "contacto@harinascentro.com",
            None,
        ),
        proveedor(
            "prov3",
            "Mercado Fresco Local",
            "55-5555-5555",
            "pedidos@mercadolocal.com",
            Some("https://maps.app.goo.gl/E5n3c7Y8X2Z9W1B1A"),
        ),
    ]
}

fn insumo(id: &str, nombre: &str, proveedor_id: &str, costo: f64, cantidad: f64, unidad: &str) -> Insumo {
    Insumo {
        id: id.to_string(),
        nombre: nombre.to_string(),
        proveedor_id: proveedor_id.to_string(),
        costo,
        cantidad_medida: cantidad,
        unidad_medida: unidad.to_string(),
    }
}

fn insumos() -> Vec<Insumo> {
    vec![
        insumo("ins1", "Harina de Trigo", "prov2", 20.0, 1.0, "kg"),
        insumo("ins2", "Azúcar Blanca", "prov1", 25.0, 1.0, "kg"),
        insumo("ins3", "Chispas de Chocolate", "prov1", 80.0, 500.0, "g"),
        insumo("ins4", "Mantequilla sin Sal", "prov1", 40.0, 250.0, "g"),
        insumo("ins5", "Huevo", "prov3", 3.0, 1.0, "pza"),
        insumo("ins6", "Fresas Frescas", "prov3", 60.0, 1.0, "kg"),
        insumo("ins7", "Leche Entera", "prov1", 25.0, 1.0, "L"),
        insumo("ins8", "Polvo para Hornear", "prov2", 15.0, 100.0, "g"),
    ]
}

fn linea(insumo_id: &str, cantidad: f64, unidad: &str) -> BocadilloInsumo {
    BocadilloInsumo {
        insumo_id: insumo_id.to_string(),
        cantidad,
        unidad: unidad.to_string(),
    }
}

fn bocadillos() -> Vec<Bocadillo> {
    vec![
        Bocadillo {
            id: "boc1".to_string(),
            nombre: "Galletas de Chispas de Chocolate".to_string(),
            precio_venta: 5.70,
            insumos: vec![
                linea("ins1", 250.0, "g"),
                linea("ins2", 150.0, "g"),
                linea("ins4", 100.0, "g"),
                linea("ins5", 2.0, "pza"),
                linea("ins3", 150.0, "g"),
            ],
            cantidad_receta: 24.0,
            porcentaje_ganancia: 150.0,
        },
        Bocadillo {
            id: "boc2".to_string(),
            nombre: "Pastelitos de Fresa".to_string(),
            precio_venta: 13.90,
            insumos: vec![
                linea("ins1", 100.0, "g"),
                linea("ins2", 80.0, "g"),
                linea("ins4", 50.0, "g"),
                linea("ins5", 1.0, "pza"),
                linea("ins7", 120.0, "ml"),
                linea("ins6", 150.0, "g"),
                linea("ins8", 5.0, "g"),
            ],
            cantidad_receta: 6.0,
            porcentaje_ganancia: 200.0,
        },
    ]
}

fn item(bocadillo_id: &str, cantidad: f64, precio_unitario: f64) -> PresupuestoItem {
    PresupuestoItem {
        bocadillo_id: bocadillo_id.to_string(),
        cantidad,
        precio_unitario,
    }
}

fn presupuestos() -> Vec<Presupuesto> {
    let ayer = (Local::now() - Duration::days(1)).to_rfc3339();

    vec![
        Presupuesto {
            id: "pre1".to_string(),
            nombre_cliente: "Fiesta Infantil Pérez".to_string(),
            items: vec![item("boc1", 48.0, 5.70), item("boc2", 12.0, 13.90)],
            total: 440.40,
            fecha: ahora_rfc3339(),
            fecha_vencimiento: Some(fecha_futura(15)),
            detalles_servicio: Some(
                "Se requiere un anticipo del 50% para confirmar el pedido. Liquidación contra entrega."
                    .to_string(),
            ),
            is_locked: true,
        },
        Presupuesto {
            id: "pre2".to_string(),
            nombre_cliente: "Reunión Corporativa Acme".to_string(),
            items: vec![item("boc1", 100.0, 5.70)],
            total: 570.00,
            fecha: ayer,
            fecha_vencimiento: Some(fecha_futura(7)),
            detalles_servicio: None,
            is_locked: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siembra_en_almacen_vacio() {
        let db = Database::en_memoria().unwrap();
        let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS).unwrap();
        let bocadillos: Vec<Bocadillo> = db.leer_lista(CLAVE_BOCADILLOS).unwrap();
        let presupuestos: Vec<Presupuesto> = db.leer_lista(CLAVE_PRESUPUESTOS).unwrap();
        assert_eq!(insumos.len(), 8);
        assert_eq!(bocadillos.len(), 2);
        assert_eq!(presupuestos.len(), 2);
        assert!(db.leer::<EmpresaInfo>(CLAVE_EMPRESA).unwrap().is_some());
    }

    #[test]
    fn test_no_pisa_datos_existentes() {
        let db = Database::en_memoria().unwrap();
        db.guardar(CLAVE_INSUMOS, &Vec::<Insumo>::new()).unwrap();
        sembrar_datos_iniciales(&db).unwrap();
        let insumos: Vec<Insumo> = db.leer_lista(CLAVE_INSUMOS).unwrap();
        assert!(insumos.is_empty());
    }

    #[test]
    fn test_totales_semilla_consistentes() {
        for p in presupuestos() {
            let total = crate::models::total_items(&p.items);
            assert!((total - p.total).abs() < 0.001);
        }
    }
}
