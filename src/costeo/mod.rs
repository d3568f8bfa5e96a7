pub mod margen;
pub mod precios;
pub mod receta;
pub mod unidades;

pub use margen::{margen_desde_precio, precio_desde_margen, PrecioMargen};
pub use precios::{actualizar_presupuestos_abiertos, recalcular_precios_bocadillos};
pub use receta::{costear_receta, mapa_insumos, CostoReceta};
pub use unidades::{convertir, unidades_compatibles, ErrorConversion, TipoUnidad};
