pub mod bocadillos;
pub mod config;
pub mod exportar;
pub mod impresion;
pub mod insumos;
pub mod presupuestos;
pub mod proveedores;
pub mod respaldo;
