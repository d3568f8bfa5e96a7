pub mod bocadillo;
pub mod empresa;
pub mod insumo;
pub mod presupuesto;
pub mod proveedor;

pub use bocadillo::*;
pub use empresa::*;
pub use insumo::*;
pub use presupuesto::*;
pub use proveedor::*;
