use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmpresaInfo {
    pub nombre: String,
    pub direccion: String,
    pub correo: String,
    pub telefono: String,
    pub detalles_servicio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for EmpresaInfo {
    fn default() -> Self {
        EmpresaInfo {
            nombre: "BocadilloPro".to_string(),
            direccion: "Av. Siempre Viva 742".to_string(),
            correo: "contacto@bocadillopro.com".to_string(),
            telefono: "55-1234-5678".to_string(),
            detalles_servicio:
                "Gracias por su preferencia. Los precios están sujetos a cambios sin previo aviso."
                    .to_string(),
            logo_url: Some(String::new()),
        }
    }
}
