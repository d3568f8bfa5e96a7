use crate::models::{Bocadillo, EmpresaInfo, Presupuesto};
use crate::utils::formatear_fecha;
use std::collections::HashMap;

const ANCHO: usize = 48;
const ANCHO_NOMBRE: usize = 22;

/// Genera el texto imprimible de un presupuesto
pub fn generar_presupuesto_texto(
    presupuesto: &Presupuesto,
    bocadillos: &[Bocadillo],
    empresa: Option<&EmpresaInfo>,
) -> String {
    let mapa: HashMap<&str, &Bocadillo> = bocadillos.iter().map(|b| (b.id.as_str(), b)).collect();
    let nombre_empresa = empresa
        .map(|e| e.nombre.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("BocadilloPro");
    let mut texto = String::new();

    // Encabezado
    texto.push_str(&centrar(nombre_empresa, ANCHO));
    if let Some(empresa) = empresa {
        for dato in [&empresa.direccion, &empresa.telefono, &empresa.correo] {
            if !dato.is_empty() {
                texto.push_str(&centrar(dato, ANCHO));
            }
        }
    }
    texto.push_str(&linea_separador(ANCHO, '='));
    texto.push_str(&centrar("PRESUPUESTO", ANCHO));
    texto.push_str(&linea_separador(ANCHO, '-'));

    texto.push_str(&format!("Fecha: {}\n", formatear_fecha(&presupuesto.fecha)));
    if let Some(vence) = presupuesto.fecha_vencimiento.as_deref().filter(|v| !v.is_empty()) {
        texto.push_str(&format!("Válido hasta: {}\n", formatear_fecha(vence)));
    }
    let id_corto: String = presupuesto.id.chars().take(8).collect();
    texto.push_str(&format!("ID: {}\n", id_corto));
    texto.push_str(&format!("Cliente: {}\n", presupuesto.nombre_cliente));

    texto.push_str(&linea_separador(ANCHO, '-'));
    texto.push_str(&format!(
        "{:<22} {:>5} {:>8} {:>10}\n",
        "BOCADILLO", "CANT", "P.UNIT", "SUBTOTAL"
    ));
    texto.push_str(&linea_separador(ANCHO, '-'));

    for item in &presupuesto.items {
        let nombre = mapa
            .get(item.bocadillo_id.as_str())
            .map(|b| b.nombre.as_str())
            .unwrap_or("Bocadillo eliminado");
        let nombre_corto: String = nombre.chars().take(ANCHO_NOMBRE).collect();

        texto.push_str(&format!(
            "{:<22} {:>5} {:>8.2} {:>10.2}\n",
            nombre_corto,
            format_cantidad(item.cantidad),
            item.precio_unitario,
            item.precio_unitario * item.cantidad
        ));
    }

    texto.push_str(&linea_separador(ANCHO, '='));
    texto.push_str(&linea_monto("TOTAL:", presupuesto.total, ANCHO));

    if let Some(detalles) = presupuesto.detalles_servicio.as_deref().filter(|d| !d.is_empty()) {
        texto.push_str(&linea_separador(ANCHO, '-'));
        texto.push_str("Detalles del servicio:\n");
        texto.push_str(detalles);
        texto.push('\n');
    }

    texto.push_str(&linea_separador(ANCHO, '-'));
    texto.push_str(&centrar("Gracias por su preferencia.", ANCHO));
    texto.push_str(&centrar(&format!("Presupuesto generado con {}", nombre_empresa), ANCHO));

    texto
}

fn centrar(valor: &str, ancho: usize) -> String {
    let largo = valor.chars().count();
    let margen = ancho.saturating_sub(largo) / 2;
    format!("{}{}\n", " ".repeat(margen), valor)
}

fn linea_separador(ancho: usize, ch: char) -> String {
    format!("{}\n", std::iter::repeat(ch).take(ancho).collect::<String>())
}

fn linea_monto(label: &str, monto: f64, ancho: usize) -> String {
    let valor = format!("${:.2}", monto);
    let espacios = ancho.saturating_sub(label.chars().count() + valor.len());
    format!("{}{}{}\n", label, " ".repeat(espacios), valor)
}

fn format_cantidad(cant: f64) -> String {
    if cant == cant.floor() {
        format!("{:.0}", cant)
    } else {
        format!("{:.2}", cant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresupuestoItem;

    fn presupuesto() -> Presupuesto {
        Presupuesto {
            id: "0123456789abcdef".to_string(),
            nombre_cliente: "Fiesta Infantil Pérez".to_string(),
            items: vec![
                PresupuestoItem {
                    bocadillo_id: "boc1".to_string(),
                    cantidad: 48.0,
                    precio_unitario: 5.70,
                },
                PresupuestoItem {
                    bocadillo_id: "borrado".to_string(),
                    cantidad: 2.5,
                    precio_unitario: 10.0,
                },
            ],
            total: 298.60,
            fecha: "2026-03-15T10:30:00-06:00".to_string(),
            fecha_vencimiento: Some("2026-03-30".to_string()),
            detalles_servicio: Some("Anticipo del 50%.".to_string()),
            is_locked: true,
        }
    }

    fn galletas() -> Bocadillo {
        Bocadillo {
            id: "boc1".to_string(),
            nombre: "Galletas de Chispas de Chocolate".to_string(),
            precio_venta: 5.70,
            insumos: vec![],
            cantidad_receta: 24.0,
            porcentaje_ganancia: 150.0,
        }
    }

    #[test]
    fn test_presupuesto_texto() {
        let empresa = EmpresaInfo::default();
        let texto = generar_presupuesto_texto(&presupuesto(), &[galletas()], Some(&empresa));

        assert!(texto.contains("PRESUPUESTO"));
        assert!(texto.contains("Válido hasta: 30/03/2026"));
        assert!(texto.contains("ID: 01234567\n"));
        assert!(texto.contains("Cliente: Fiesta Infantil Pérez"));
        assert!(texto.contains("Galletas de Chispas de    48     5.70     273.60"));
        assert!(texto.contains("Bocadillo eliminado     2.50    10.00      25.00"));
        assert!(texto.contains("$298.60"));
        assert!(texto.contains("Anticipo del 50%."));
        assert!(texto.contains("Presupuesto generado con BocadilloPro"));
    }

    #[test]
    fn test_sin_empresa() {
        let mut p = presupuesto();
        p.detalles_servicio = None;
        let texto = generar_presupuesto_texto(&p, &[], None);
        assert!(texto.contains("Presupuesto generado con BocadilloPro"));
        assert!(!texto.contains("Detalles del servicio"));
    }

    #[test]
    fn test_linea_monto_alineada() {
        let linea = linea_monto("TOTAL:", 12.5, 20);
        assert_eq!(linea, "TOTAL:        $12.50\n");
        assert_eq!(linea.trim_end().len(), 20);
    }
}
