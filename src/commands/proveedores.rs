use crate::db::{Database, CLAVE_PROVEEDORES};
use crate::error::AppError;
use crate::models::{NuevoProveedor, Proveedor};
use crate::utils::generar_id;

pub fn listar_proveedores(db: &Database) -> Result<Vec<Proveedor>, AppError> {
    let mut proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    proveedores.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
    Ok(proveedores)
}

pub fn obtener_proveedor(db: &Database, id: &str) -> Result<Proveedor, AppError> {
    db.leer_lista::<Proveedor>(CLAVE_PROVEEDORES)?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::no_encontrado("Proveedor", id))
}

pub fn crear_proveedor(db: &Database, proveedor: NuevoProveedor) -> Result<Proveedor, AppError> {
    if proveedor.nombre.trim().is_empty() {
        return Err(AppError::validacion("El nombre del proveedor es requerido"));
    }

    let mut proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    let nuevo = proveedor.con_id(generar_id());
    proveedores.push(nuevo.clone());
    db.guardar(CLAVE_PROVEEDORES, &proveedores)?;

    Ok(nuevo)
}

pub fn actualizar_proveedor(db: &Database, proveedor: Proveedor) -> Result<(), AppError> {
    if proveedor.nombre.trim().is_empty() {
        return Err(AppError::validacion("El nombre del proveedor es requerido"));
    }

    let mut proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    let existente = proveedores
        .iter_mut()
        .find(|p| p.id == proveedor.id)
        .ok_or_else(|| AppError::no_encontrado("Proveedor", proveedor.id.clone()))?;
    *existente = proveedor;
    db.guardar(CLAVE_PROVEEDORES, &proveedores)?;

    Ok(())
}

/// Los insumos que apuntaban a este proveedor quedan "Sin Proveedor".
pub fn eliminar_proveedor(db: &Database, id: &str) -> Result<(), AppError> {
    let mut proveedores: Vec<Proveedor> = db.leer_lista(CLAVE_PROVEEDORES)?;
    let antes = proveedores.len();
    proveedores.retain(|p| p.id != id);

    if proveedores.len() == antes {
        return Err(AppError::no_encontrado("Proveedor", id));
    }

    db.guardar(CLAVE_PROVEEDORES, &proveedores)?;
    Ok(())
}
