//! Request and response bodies of the remote services.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use tcg_store_core::{Price, ProductId, UserId};

use crate::models::Product;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// `POST api/auth/login` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub correo_electronico: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// `POST api/auth/register` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub nombre_completo: String,
    pub correo_electronico: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(serialize_with = "expose")]
    pub confirmar_password: SecretString,
}

/// Successful login or registration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(deserialize_with = "secret")]
    pub token: SecretString,
    #[serde(default = "default_token_type")]
    pub tipo: String,
    pub correo_electronico: String,
    pub nombre_completo: String,
    pub role: String,
    #[serde(default)]
    pub mensaje: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("tipo", &self.tipo)
            .field("correo_electronico", &self.correo_electronico)
            .field("nombre_completo", &self.nombre_completo)
            .field("role", &self.role)
            .field("mensaje", &self.mensaje)
            .finish()
    }
}

/// `GET api/user/profile` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: UserId,
    pub nombre_completo: String,
    pub correo_electronico: String,
    pub role: String,
    pub fecha_registro: String,
}

/// One entry of `GET api/admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub id: UserId,
    pub nombre_completo: String,
    pub correo_electronico: String,
    pub role: String,
    pub fecha_registro: String,
    pub enabled: bool,
}

/// A product owned by the main service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub nombre: String,
    pub descripcion: String,
    pub precio: Price,
    /// Server path of the main image, e.g. `/uploads/box.jpg`.
    pub imagen: String,
    #[serde(default)]
    pub hover: Option<String>,
    /// Promotional label such as `OFERTA`.
    #[serde(default)]
    pub oferta: Option<String>,
}

impl ProductResponse {
    /// Cart-ready product snapshot, with the image resolved to `image_url`.
    #[must_use]
    pub fn into_product(self, image_url: String) -> Product {
        Product {
            id: Some(self.id),
            name: self.nombre,
            description: self.descripcion,
            price: self.precio,
            image: image_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_names() {
        let body = serde_json::to_value(LoginRequest {
            correo_electronico: "ash@pallet.town".to_string(),
            password: SecretString::from("Pikachu.25"),
        })
        .unwrap();

        assert_eq!(body["correoElectronico"], "ash@pallet.town");
        assert_eq!(body["password"], "Pikachu.25");
    }

    #[test]
    fn test_auth_response_defaults_and_redaction() {
        let raw = r#"{"token":"jwt.value.here","correoElectronico":"ash@pallet.town",
            "nombreCompleto":"Ash Ketchum","role":"USER"}"#;
        let response: AuthResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response.tipo, "Bearer");
        assert_eq!(response.token.expose_secret(), "jwt.value.here");
        assert!(!format!("{response:?}").contains("jwt.value.here"));
    }

    #[test]
    fn test_product_response_optional_fields() {
        let raw = r#"{"id":2,"nombre":"One Piece Card Game Booster Box",
            "descripcion":"Caja de sobres","precio":60000,"imagen":"/uploads/onepiece-box.jpg"}"#;
        let product: ProductResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.hover, None);
        assert_eq!(product.oferta, None);

        let local = product.into_product("http://main/uploads/onepiece-box.jpg".to_string());
        assert_eq!(local.id, Some(ProductId::new(2)));
        assert_eq!(local.price, Price::new(60_000));
    }
}
