use chrono::{DateTime, Duration, Local, NaiveDate};

/// Genera un identificador aleatorio (UUID v4)
pub fn generar_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Redondea un monto a centavos
pub fn redondear_centavos(valor: f64) -> f64 {
    (valor * 100.0).round() / 100.0
}

/// Fecha y hora actual en RFC 3339
pub fn ahora_rfc3339() -> String {
    Local::now().to_rfc3339()
}

/// Fecha (YYYY-MM-DD) dentro de `dias` días
pub fn fecha_futura(dias: i64) -> String {
    (Local::now().date_naive() + Duration::days(dias))
        .format("%Y-%m-%d")
        .to_string()
}

/// Interpreta una fecha RFC 3339 o YYYY-MM-DD
pub fn parsear_fecha(fecha: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(fecha) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    NaiveDate::parse_from_str(fecha, "%Y-%m-%d").ok()
}

/// Formato dd/mm/yyyy; si la fecha no se puede interpretar se devuelve tal cual
pub fn formatear_fecha(fecha: &str) -> String {
    parsear_fecha(fecha)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| fecha.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redondear_centavos() {
        assert_eq!(redondear_centavos(5.7049), 5.7);
        assert_eq!(redondear_centavos(13.896), 13.9);
        assert_eq!(redondear_centavos(0.0), 0.0);
    }

    #[test]
    fn test_ids_unicos() {
        let a = generar_id();
        let b = generar_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_formatear_fecha() {
        assert_eq!(formatear_fecha("2026-03-15"), "15/03/2026");
        assert_eq!(formatear_fecha("sin fecha"), "sin fecha");
        let ahora = ahora_rfc3339();
        assert!(parsear_fecha(&ahora).is_some());
    }

    #[test]
    fn test_fecha_futura() {
        let hoy = Local::now().date_naive();
        let fecha = parsear_fecha(&fecha_futura(15)).unwrap();
        assert_eq!((fecha - hoy).num_days(), 15);
    }
}
