pub mod migraciones;
pub mod schema;
pub mod semilla;

use crate::error::AppError;
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const CLAVE_INSUMOS: &str = "insumos";
pub const CLAVE_PROVEEDORES: &str = "proveedores";
pub const CLAVE_BOCADILLOS: &str = "bocadillos";
pub const CLAVE_PRESUPUESTOS: &str = "presupuestos";
pub const CLAVE_EMPRESA: &str = "empresaInfo";

pub struct Database {
    pub conn: Mutex<Connection>,
    ruta: Option<PathBuf>,
}

impl Database {
    /// Abre (o crea) la base de datos en `ruta`, aplica migraciones y datos iniciales.
    pub fn new(ruta: &Path) -> Result<Self, AppError> {
        if let Some(parent) = ruta.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(ruta)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;
             PRAGMA busy_timeout = 5000;",
        )?;

        Self::inicializar(conn, Some(ruta.to_path_buf()))
    }

    /// Base de datos en memoria (pruebas y uso efímero)
    pub fn en_memoria() -> Result<Self, AppError> {
        Self::inicializar(Connection::open_in_memory()?, None)
    }

    fn inicializar(conn: Connection, ruta: Option<PathBuf>) -> Result<Self, AppError> {
        schema::create_tables(&conn)?;

        let db = Database {
            conn: Mutex::new(conn),
            ruta,
        };

        migraciones::ejecutar_migraciones(&db)?;
        semilla::sembrar_datos_iniciales(&db)?;

        Ok(db)
    }

    pub fn ruta(&self) -> Option<&Path> {
        self.ruta.as_deref()
    }

    pub fn tiene_clave(&self, clave: &str) -> Result<bool, AppError> {
        Ok(self.leer_texto(clave)?.is_some())
    }

    pub fn leer_texto(&self, clave: &str) -> Result<Option<String>, AppError> {
        let conn = self.conn.lock()?;
        let valor = conn
            .query_row(
                "SELECT valor FROM almacen WHERE clave = ?1",
                rusqlite::params![clave],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(valor)
    }

    pub fn guardar_texto(&self, clave: &str, valor: &str) -> Result<(), AppError> {
        let conn = self.conn.lock()?;
        conn.execute(
            "INSERT INTO almacen (clave, valor) VALUES (?1, ?2)
             ON CONFLICT(clave) DO UPDATE SET valor = excluded.valor,
             updated_at = datetime('now', 'localtime')",
            rusqlite::params![clave, valor],
        )?;
        Ok(())
    }

    pub fn eliminar_clave(&self, clave: &str) -> Result<(), AppError> {
        let conn = self.conn.lock()?;
        conn.execute("DELETE FROM almacen WHERE clave = ?1", rusqlite::params![clave])?;
        Ok(())
    }

    /// Borra todas las claves del almacén
    pub fn vaciar(&self) -> Result<usize, AppError> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;
        let borradas = tx.execute("DELETE FROM almacen", [])?;
        tx.commit()?;
        Ok(borradas)
    }

    /// Valor JSON sin tipar (lo usan las migraciones para inspeccionar formas antiguas)
    pub fn leer_valor(&self, clave: &str) -> Result<Option<Value>, AppError> {
        match self.leer_texto(clave)? {
            Some(texto) => Ok(Some(serde_json::from_str(&texto)?)),
            None => Ok(None),
        }
    }

    pub fn guardar_valor(&self, clave: &str, valor: &Value) -> Result<(), AppError> {
        self.guardar_texto(clave, &serde_json::to_string(valor)?)
    }

    pub fn leer<T: DeserializeOwned>(&self, clave: &str) -> Result<Option<T>, AppError> {
        match self.leer_texto(clave)? {
            Some(texto) => Ok(Some(serde_json::from_str(&texto)?)),
            None => Ok(None),
        }
    }

    /// Lista guardada en `clave`; vacía si la clave no existe o vale `null`
    pub fn leer_lista<T: DeserializeOwned>(&self, clave: &str) -> Result<Vec<T>, AppError> {
        Ok(self.leer::<Option<Vec<T>>>(clave)?.flatten().unwrap_or_default())
    }

    pub fn guardar<T: Serialize + ?Sized>(&self, clave: &str, valor: &T) -> Result<(), AppError> {
        self.guardar_texto(clave, &serde_json::to_string(valor)?)
    }

    /// Todas las entradas del almacén, ordenadas por clave
    pub fn entradas(&self) -> Result<Vec<(String, String)>, AppError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT clave, valor FROM almacen ORDER BY clave")?;
        let entradas = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entradas)
    }

    /// Reemplaza varias claves en una sola transacción
    pub fn guardar_varios(&self, entradas: &[(String, String)]) -> Result<(), AppError> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;
        for (clave, valor) in entradas {
            tx.execute(
                "INSERT INTO almacen (clave, valor) VALUES (?1, ?2)
                 ON CONFLICT(clave) DO UPDATE SET valor = excluded.valor,
                 updated_at = datetime('now', 'localtime')",
                rusqlite::params![clave, valor],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
