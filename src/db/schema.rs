use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Almacén clave/valor: cada valor es un documento JSON
        -- (listas de insumos, proveedores, bocadillos, presupuestos,
        -- información de la empresa y banderas de migración)
        CREATE TABLE IF NOT EXISTS almacen (
            clave TEXT PRIMARY KEY,
            valor TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );
        ",
    )?;

    Ok(())
}
