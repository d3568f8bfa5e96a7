//! Subcomandos de línea de comandos sobre las operaciones de `commands`.

use crate::commands::{
    bocadillos, config, exportar, impresion, insumos, presupuestos, proveedores, respaldo,
};
use crate::costeo::unidades;
use crate::db::Database;
use crate::error::AppError;
use crate::models::{
    AgruparPor, BocadilloInsumo, NuevoBocadillo, NuevoInsumo, NuevoPresupuesto, NuevoProveedor,
    PresupuestoItem,
};
use crate::utils::formatear_fecha;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insumos (ingredientes) y su costo de compra
    Insumos {
        #[command(subcommand)]
        accion: AccionInsumo,
    },

    /// Proveedores de insumos
    Proveedores {
        #[command(subcommand)]
        accion: AccionProveedor,
    },

    /// Bocadillos: recetas, costos y precios
    Bocadillos {
        #[command(subcommand)]
        accion: AccionBocadillo,
    },

    /// Presupuestos para clientes
    Presupuestos {
        #[command(subcommand)]
        accion: AccionPresupuesto,
    },

    /// Información de la empresa que aparece en los presupuestos
    Empresa {
        #[command(subcommand)]
        accion: AccionEmpresa,
    },

    /// Exportar todos los datos a un archivo JSON
    Exportar {
        /// Archivo destino
        ruta: PathBuf,
    },

    /// Importar datos desde un respaldo JSON (sobrescribe los actuales)
    Importar {
        /// Archivo de respaldo
        ruta: PathBuf,
    },

    /// Reportes CSV
    Csv {
        #[arg(value_enum)]
        reporte: ReporteCsv,

        /// Archivo destino
        ruta: PathBuf,
    },

    /// Convertir una cantidad entre unidades
    Convertir {
        valor: f64,
        desde: String,
        hasta: String,
    },

    /// Mostrar la ruta de la base de datos
    Ruta,

    /// Eliminar TODOS los datos y volver a los datos de ejemplo
    Restablecer {
        /// Confirma la operación (es irreversible)
        #[arg(long)]
        confirmar: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccionInsumo {
    /// Listar insumos agrupados
    Listar {
        #[arg(long, value_enum, default_value = "proveedor")]
        agrupar: Agrupacion,
    },

    /// Registrar un insumo
    Crear {
        #[arg(long)]
        nombre: String,

        /// ID del proveedor
        #[arg(long)]
        proveedor: String,

        /// Costo de compra
        #[arg(long)]
        costo: f64,

        /// Cantidad a la que aplica el costo
        #[arg(long, default_value_t = 1.0)]
        cantidad: f64,

        /// Unidad de compra (kg, g, mg, L, ml, pza...)
        #[arg(long)]
        unidad: String,
    },

    /// Modificar un insumo; recalcula precios de bocadillos
    Actualizar {
        id: String,

        #[arg(long)]
        nombre: Option<String>,

        #[arg(long)]
        proveedor: Option<String>,

        #[arg(long)]
        costo: Option<f64>,

        #[arg(long)]
        cantidad: Option<f64>,

        #[arg(long)]
        unidad: Option<String>,
    },

    /// Eliminar un insumo
    Eliminar { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AccionProveedor {
    /// Listar proveedores
    Listar,

    /// Registrar un proveedor
    Crear {
        #[arg(long)]
        nombre: String,

        #[arg(long)]
        telefono: Option<String>,

        #[arg(long)]
        correo: Option<String>,

        #[arg(long)]
        direccion: Option<String>,

        #[arg(long)]
        pagina_web: Option<String>,

        #[arg(long)]
        ubicacion_url: Option<String>,
    },

    /// Mostrar un proveedor
    Obtener { id: String },

    /// Modificar un proveedor
    Actualizar {
        id: String,

        #[arg(long)]
        nombre: Option<String>,

        #[arg(long)]
        telefono: Option<String>,

        #[arg(long)]
        correo: Option<String>,

        #[arg(long)]
        direccion: Option<String>,

        #[arg(long)]
        pagina_web: Option<String>,

        #[arg(long)]
        ubicacion_url: Option<String>,
    },

    /// Eliminar un proveedor
    Eliminar { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AccionBocadillo {
    /// Listar bocadillos con costo, precio y ganancia
    Listar,

    /// Mostrar el costeo detallado de un bocadillo
    Costo { id: String },

    /// Registrar un bocadillo; el precio se deriva del margen
    Crear {
        #[arg(long)]
        nombre: String,

        /// Piezas que rinde la receta
        #[arg(long, default_value_t = 1.0)]
        rinde: f64,

        /// Porcentaje de ganancia
        #[arg(long, default_value_t = 0.0)]
        margen: f64,

        /// Línea de receta como INSUMO_ID:CANTIDAD:UNIDAD (repetible)
        #[arg(long = "insumo", value_parser = parsear_linea_receta)]
        insumos: Vec<BocadilloInsumo>,
    },

    /// Mostrar un bocadillo con su receta
    Obtener { id: String },

    /// Modificar nombre, rendimiento o receta; el precio se recalcula con el margen guardado
    Actualizar {
        id: String,

        #[arg(long)]
        nombre: Option<String>,

        /// Piezas que rinde la receta
        #[arg(long)]
        rinde: Option<f64>,

        /// Reemplaza la receta; INSUMO_ID:CANTIDAD:UNIDAD (repetible)
        #[arg(long = "insumo", value_parser = parsear_linea_receta)]
        insumos: Vec<BocadilloInsumo>,
    },

    /// Fijar el porcentaje de ganancia (recalcula el precio)
    Margen { id: String, porcentaje: f64 },

    /// Fijar el precio de venta (recalcula el porcentaje de ganancia)
    Precio { id: String, precio: f64 },

    /// Eliminar un bocadillo
    Eliminar { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AccionPresupuesto {
    /// Listar presupuestos, más recientes primero
    Listar,

    /// Crear un presupuesto a precios actuales
    Crear {
        #[arg(long)]
        cliente: String,

        /// Item como BOCADILLO_ID:CANTIDAD[:MARGEN] (repetible)
        #[arg(long = "item", value_parser = parsear_item)]
        items: Vec<ItemCli>,

        /// Fecha de vencimiento (YYYY-MM-DD)
        #[arg(long)]
        vence: Option<String>,

        #[arg(long)]
        detalles: Option<String>,
    },

    /// Mostrar un presupuesto
    Obtener { id: String },

    /// Modificar cliente, items, vencimiento o detalles
    Actualizar {
        id: String,

        #[arg(long)]
        cliente: Option<String>,

        /// Reemplaza los items; BOCADILLO_ID:CANTIDAD[:MARGEN] (repetible)
        #[arg(long = "item", value_parser = parsear_item)]
        items: Vec<ItemCli>,

        /// Fecha de vencimiento (YYYY-MM-DD)
        #[arg(long)]
        vence: Option<String>,

        #[arg(long)]
        detalles: Option<String>,
    },

    /// Costo, venta y ganancia de un presupuesto
    Resumen { id: String },

    /// Duplicar un presupuesto
    Duplicar { id: String },

    /// Bloquear o desbloquear la actualización automática de precios
    Bloqueo { id: String },

    /// Imprimir un presupuesto como texto
    Imprimir {
        id: String,

        /// Guardar en archivo en lugar de mostrar
        #[arg(short, long)]
        salida: Option<PathBuf>,
    },

    /// Eliminar un presupuesto
    Eliminar { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AccionEmpresa {
    /// Mostrar la información de la empresa
    Mostrar,

    /// Modificar la información de la empresa
    Guardar {
        #[arg(long)]
        nombre: Option<String>,

        #[arg(long)]
        direccion: Option<String>,

        #[arg(long)]
        correo: Option<String>,

        #[arg(long)]
        telefono: Option<String>,

        #[arg(long)]
        detalles: Option<String>,
    },

    /// Cargar el logo desde una imagen (máximo 500KB)
    Logo { ruta: PathBuf },

    /// Quitar el logo
    QuitarLogo,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Agrupacion {
    Proveedor,
    Nombre,
}

impl From<Agrupacion> for AgruparPor {
    fn from(valor: Agrupacion) -> Self {
        match valor {
            Agrupacion::Proveedor => AgruparPor::Proveedor,
            Agrupacion::Nombre => AgruparPor::Nombre,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReporteCsv {
    Insumos,
    Costos,
}

#[derive(Clone, Debug)]
pub struct ItemCli {
    pub bocadillo_id: String,
    pub cantidad: f64,
    pub margen: Option<f64>,
}

fn parsear_numero(texto: &str) -> Result<f64, String> {
    texto
        .parse::<f64>()
        .map_err(|_| format!("número inválido: '{}'", texto))
}

fn parsear_linea_receta(texto: &str) -> Result<BocadilloInsumo, String> {
    let partes: Vec<&str> = texto.split(':').collect();
    match partes.as_slice() {
        [insumo_id, cantidad, unidad] => Ok(BocadilloInsumo {
            insumo_id: insumo_id.to_string(),
            cantidad: parsear_numero(cantidad)?,
            unidad: unidad.to_string(),
        }),
        _ => Err(format!("se esperaba INSUMO_ID:CANTIDAD:UNIDAD, se recibió '{}'", texto)),
    }
}

fn parsear_item(texto: &str) -> Result<ItemCli, String> {
    let partes: Vec<&str> = texto.split(':').collect();
    match partes.as_slice() {
        [bocadillo_id, cantidad] => Ok(ItemCli {
            bocadillo_id: bocadillo_id.to_string(),
            cantidad: parsear_numero(cantidad)?,
            margen: None,
        }),
        [bocadillo_id, cantidad, margen] => Ok(ItemCli {
            bocadillo_id: bocadillo_id.to_string(),
            cantidad: parsear_numero(cantidad)?,
            margen: Some(parsear_numero(margen)?),
        }),
        _ => Err(format!("se esperaba BOCADILLO_ID:CANTIDAD[:MARGEN], se recibió '{}'", texto)),
    }
}

fn imprimir_json<T: Serialize>(valor: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(valor)?);
    Ok(())
}

pub fn dispatch(db: &Database, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Insumos { accion } => cmd_insumos(db, accion),
        Commands::Proveedores { accion } => cmd_proveedores(db, accion),
        Commands::Bocadillos { accion } => cmd_bocadillos(db, accion),
        Commands::Presupuestos { accion } => cmd_presupuestos(db, accion),
        Commands::Empresa { accion } => cmd_empresa(db, accion),
        Commands::Exportar { ruta } => {
            let total = respaldo::exportar_a_archivo(db, &ruta)?;
            println!("{} claves exportadas a {}", total, ruta.display());
            Ok(())
        }
        Commands::Importar { ruta } => {
            let total = respaldo::importar_desde_archivo(db, &ruta)?;
            println!("{} claves importadas desde {}", total, ruta.display());
            Ok(())
        }
        Commands::Csv { reporte, ruta } => {
            let mensaje = match reporte {
                ReporteCsv::Insumos => exportar::exportar_insumos_csv(db, &ruta)?,
                ReporteCsv::Costos => exportar::exportar_costos_csv(db, &ruta)?,
            };
            println!("{}", mensaje);
            Ok(())
        }
        Commands::Convertir { valor, desde, hasta } => {
            let resultado = unidades::convertir(valor, &desde, &hasta)
                .map_err(|e| AppError::validacion(e.to_string()))?;
            println!("{} {} = {} {}", valor, desde, resultado, hasta);
            Ok(())
        }
        Commands::Ruta => {
            println!("{}", respaldo::obtener_ruta_db(db)?);
            Ok(())
        }
        Commands::Restablecer { confirmar } => {
            if !confirmar {
                return Err(AppError::validacion(
                    "Esta acción elimina TODOS los datos; repita con --confirmar",
                ));
            }
            let borradas = respaldo::restablecer_datos(db)?;
            println!("{} claves eliminadas; datos de ejemplo restaurados", borradas);
            Ok(())
        }
    }
}

fn cmd_insumos(db: &Database, accion: AccionInsumo) -> Result<(), AppError> {
    match accion {
        AccionInsumo::Listar { agrupar } => {
            for (grupo, lista) in insumos::listar_insumos_agrupados(db, agrupar.into())? {
                println!("{}", grupo);
                for i in lista {
                    println!(
                        "  {:<36} {:<28} ${:>8.2} / {} {}",
                        i.id, i.nombre, i.costo, i.cantidad_medida, i.unidad_medida
                    );
                }
            }
            Ok(())
        }
        AccionInsumo::Crear {
            nombre,
            proveedor,
            costo,
            cantidad,
            unidad,
        } => {
            let creado = insumos::crear_insumo(
                db,
                NuevoInsumo {
                    nombre,
                    proveedor_id: proveedor,
                    costo,
                    cantidad_medida: cantidad,
                    unidad_medida: unidad,
                },
            )?;
            imprimir_json(&creado)
        }
        AccionInsumo::Actualizar {
            id,
            nombre,
            proveedor,
            costo,
            cantidad,
            unidad,
        } => {
            let mut insumo = insumos::obtener_insumo(db, &id)?;
            if let Some(nombre) = nombre {
                insumo.nombre = nombre;
            }
            if let Some(proveedor) = proveedor {
                insumo.proveedor_id = proveedor;
            }
            if let Some(costo) = costo {
                insumo.costo = costo;
            }
            if let Some(cantidad) = cantidad {
                insumo.cantidad_medida = cantidad;
            }
            if let Some(unidad) = unidad {
                insumo.unidad_medida = unidad;
            }
            let cambiados = insumos::actualizar_insumo(db, insumo)?;
            println!("Insumo actualizado; {} bocadillos cambiaron de precio", cambiados);
            Ok(())
        }
        AccionInsumo::Eliminar { id } => {
            let cambiados = insumos::eliminar_insumo(db, &id)?;
            println!("Insumo eliminado; {} bocadillos cambiaron de precio", cambiados);
            Ok(())
        }
    }
}

fn cmd_proveedores(db: &Database, accion: AccionProveedor) -> Result<(), AppError> {
    match accion {
        AccionProveedor::Listar => {
            for p in proveedores::listar_proveedores(db)? {
                println!(
                    "{:<36} {:<30} {:<14} {}",
                    p.id,
                    p.nombre,
                    p.telefono.as_deref().unwrap_or("-"),
                    p.correo.as_deref().unwrap_or("-")
                );
            }
            Ok(())
        }
        AccionProveedor::Crear {
            nombre,
            telefono,
            correo,
            direccion,
            pagina_web,
            ubicacion_url,
        } => {
            let creado = proveedores::crear_proveedor(
                db,
                NuevoProveedor {
                    nombre,
                    telefono,
                    correo,
                    direccion,
                    pagina_web,
                    foto_url: None,
                    ubicacion_url,
                },
            )?;
            imprimir_json(&creado)
        }
        AccionProveedor::Obtener { id } => imprimir_json(&proveedores::obtener_proveedor(db, &id)?),
        AccionProveedor::Actualizar {
            id,
            nombre,
            telefono,
            correo,
            direccion,
            pagina_web,
            ubicacion_url,
        } => {
            let mut proveedor = proveedores::obtener_proveedor(db, &id)?;
            if let Some(nombre) = nombre {
                proveedor.nombre = nombre;
            }
            if telefono.is_some() {
                proveedor.telefono = telefono;
            }
            if correo.is_some() {
                proveedor.correo = correo;
            }
            if direccion.is_some() {
                proveedor.direccion = direccion;
            }
            if pagina_web.is_some() {
                proveedor.pagina_web = pagina_web;
            }
            if ubicacion_url.is_some() {
                proveedor.ubicacion_url = ubicacion_url;
            }
            proveedores::actualizar_proveedor(db, proveedor)?;
            println!("Proveedor actualizado");
            Ok(())
        }
        AccionProveedor::Eliminar { id } => {
            proveedores::eliminar_proveedor(db, &id)?;
            println!("Proveedor eliminado");
            Ok(())
        }
    }
}

fn cmd_bocadillos(db: &Database, accion: AccionBocadillo) -> Result<(), AppError> {
    match accion {
        AccionBocadillo::Listar => {
            println!(
                "{:<36} {:<32} {:>9} {:>9} {:>9}",
                "ID", "BOCADILLO", "COSTO", "PRECIO", "GANANCIA"
            );
            for c in bocadillos::listar_costos_bocadillos(db)? {
                println!(
                    "{:<36} {:<32} {:>9.2} {:>9.2} {:>8.1}%",
                    c.bocadillo_id, c.nombre, c.costo_por_unidad, c.precio_venta, c.porcentaje_ganancia
                );
            }
            Ok(())
        }
        AccionBocadillo::Costo { id } => imprimir_json(&bocadillos::costear_bocadillo(db, &id)?),
        AccionBocadillo::Crear {
            nombre,
            rinde,
            margen,
            insumos,
        } => {
            let precio_venta = bocadillos::precio_para_margen(db, &insumos, rinde, margen)?;
            let creado = bocadillos::crear_bocadillo(
                db,
                NuevoBocadillo {
                    nombre,
                    precio_venta,
                    insumos,
                    cantidad_receta: rinde,
                    porcentaje_ganancia: margen,
                },
            )?;
            imprimir_json(&creado)
        }
        AccionBocadillo::Obtener { id } => imprimir_json(&bocadillos::obtener_bocadillo(db, &id)?),
        AccionBocadillo::Actualizar {
            id,
            nombre,
            rinde,
            insumos,
        } => {
            let mut bocadillo = bocadillos::obtener_bocadillo(db, &id)?;
            if let Some(nombre) = nombre {
                bocadillo.nombre = nombre;
            }
            if let Some(rinde) = rinde {
                bocadillo.cantidad_receta = rinde;
            }
            if !insumos.is_empty() {
                bocadillo.insumos = insumos;
            }
            bocadillo.precio_venta = bocadillos::precio_para_margen(
                db,
                &bocadillo.insumos,
                bocadillo.cantidad_receta,
                bocadillo.porcentaje_ganancia,
            )?;
            bocadillos::actualizar_bocadillo(db, bocadillo)?;
            imprimir_json(&bocadillos::obtener_bocadillo(db, &id)?)
        }
        AccionBocadillo::Margen { id, porcentaje } => {
            imprimir_json(&bocadillos::fijar_margen_bocadillo(db, &id, porcentaje)?)
        }
        AccionBocadillo::Precio { id, precio } => {
            imprimir_json(&bocadillos::fijar_precio_bocadillo(db, &id, precio)?)
        }
        AccionBocadillo::Eliminar { id } => {
            bocadillos::eliminar_bocadillo(db, &id)?;
            println!("Bocadillo eliminado");
            Ok(())
        }
    }
}

/// Items a precio vigente del bocadillo, o con un margen propio si se indicó
fn items_presupuesto(db: &Database, items: Vec<ItemCli>) -> Result<Vec<PresupuestoItem>, AppError> {
    let mut lineas = Vec::with_capacity(items.len());
    for item in items {
        let precio_unitario = match item.margen {
            Some(margen) => presupuestos::precio_item_con_margen(db, &item.bocadillo_id, margen)?,
            None => bocadillos::obtener_bocadillo(db, &item.bocadillo_id)?.precio_venta,
        };
        lineas.push(PresupuestoItem {
            bocadillo_id: item.bocadillo_id,
            cantidad: item.cantidad,
            precio_unitario,
        });
    }
    Ok(lineas)
}

fn cmd_presupuestos(db: &Database, accion: AccionPresupuesto) -> Result<(), AppError> {
    match accion {
        AccionPresupuesto::Listar => {
            for p in presupuestos::listar_presupuestos(db)? {
                println!(
                    "{:<36} {:<30} {:>10} ${:>10.2} {}",
                    p.id,
                    p.nombre_cliente,
                    formatear_fecha(&p.fecha),
                    p.total,
                    if p.is_locked { "bloqueado" } else { "abierto" }
                );
            }
            Ok(())
        }
        AccionPresupuesto::Crear {
            cliente,
            items,
            vence,
            detalles,
        } => {
            let lineas = items_presupuesto(db, items)?;
            let creado = presupuestos::crear_presupuesto(
                db,
                NuevoPresupuesto {
                    nombre_cliente: cliente,
                    items: lineas,
                    fecha_vencimiento: vence,
                    detalles_servicio: detalles,
                },
            )?;
            imprimir_json(&creado)
        }
        AccionPresupuesto::Obtener { id } => imprimir_json(&presupuestos::obtener_presupuesto(db, &id)?),
        AccionPresupuesto::Actualizar {
            id,
            cliente,
            items,
            vence,
            detalles,
        } => {
            let mut presupuesto = presupuestos::obtener_presupuesto(db, &id)?;
            if let Some(cliente) = cliente {
                presupuesto.nombre_cliente = cliente;
            }
            if !items.is_empty() {
                presupuesto.items = items_presupuesto(db, items)?;
            }
            if vence.is_some() {
                presupuesto.fecha_vencimiento = vence;
            }
            if detalles.is_some() {
                presupuesto.detalles_servicio = detalles;
            }
            imprimir_json(&presupuestos::actualizar_presupuesto(db, presupuesto)?)
        }
        AccionPresupuesto::Resumen { id } => imprimir_json(&presupuestos::resumen_presupuesto(db, &id)?),
        AccionPresupuesto::Duplicar { id } => imprimir_json(&presupuestos::duplicar_presupuesto(db, &id)?),
        AccionPresupuesto::Bloqueo { id } => {
            let bloqueado = presupuestos::alternar_bloqueo(db, &id)?;
            println!(
                "Presupuesto {}",
                if bloqueado { "bloqueado" } else { "desbloqueado" }
            );
            Ok(())
        }
        AccionPresupuesto::Imprimir { id, salida } => match salida {
            Some(ruta) => impresion::guardar_presupuesto_texto(db, &id, &ruta),
            None => {
                print!("{}", impresion::imprimir_presupuesto(db, &id)?);
                Ok(())
            }
        },
        AccionPresupuesto::Eliminar { id } => {
            presupuestos::eliminar_presupuesto(db, &id)?;
            println!("Presupuesto eliminado");
            Ok(())
        }
    }
}

fn cmd_empresa(db: &Database, accion: AccionEmpresa) -> Result<(), AppError> {
    match accion {
        AccionEmpresa::Mostrar => {
            let mut empresa = config::obtener_empresa(db)?;
            // El data URL del logo no aporta nada en la terminal
            if let Some(logo) = empresa.logo_url.as_mut().filter(|l| !l.is_empty()) {
                *logo = format!("({} bytes)", logo.len());
            }
            imprimir_json(&empresa)
        }
        AccionEmpresa::Guardar {
            nombre,
            direccion,
            correo,
            telefono,
            detalles,
        } => {
            let mut empresa = config::obtener_empresa(db)?;
            if let Some(nombre) = nombre {
                empresa.nombre = nombre;
            }
            if let Some(direccion) = direccion {
                empresa.direccion = direccion;
            }
            if let Some(correo) = correo {
                empresa.correo = correo;
            }
            if let Some(telefono) = telefono {
                empresa.telefono = telefono;
            }
            if let Some(detalles) = detalles {
                empresa.detalles_servicio = detalles;
            }
            config::guardar_empresa(db, &empresa)?;
            println!("Información de la empresa guardada");
            Ok(())
        }
        AccionEmpresa::Logo { ruta } => {
            println!("{}", config::cargar_logo(db, &ruta)?);
            Ok(())
        }
        AccionEmpresa::QuitarLogo => {
            println!("{}", config::eliminar_logo(db)?);
            Ok(())
        }
    }
}
