//! User domain types.

use serde::{Deserialize, Serialize};

use tcg_store_core::{Email, PasswordDigest};

/// A registered storefront user.
///
/// The email is the identity key: profile edits find the record by email and
/// replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "apellido")]
    pub last_name: String,
    /// National identity number (RUT).
    #[serde(rename = "rut")]
    pub national_id: String,
    /// Email address (identity key).
    #[serde(rename = "correo")]
    pub email: Email,
    /// Shipping address.
    #[serde(rename = "direccion")]
    pub address: String,
    /// Nine-digit phone number.
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Stored password credential.
    #[serde(rename = "contrasena")]
    pub password: PasswordDigest,
    /// Reference to a profile photo, if one was picked.
    #[serde(rename = "photoUri", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl User {
    /// Display name ("First Last").
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Copy of this user with the editable profile fields replaced.
    ///
    /// Email and password are not part of a profile edit.
    #[must_use]
    pub fn with_profile(&self, profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            national_id: profile.national_id,
            address: profile.address,
            phone: profile.phone,
            photo: profile.photo,
            ..self.clone()
        }
    }
}

/// The fields a user may change on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub address: String,
    pub phone: String,
    pub photo: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            national_id: user.national_id.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            photo: user.photo.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            first_name: "Ash".to_string(),
            last_name: "Ketchum".to_string(),
            national_id: "12345678-9".to_string(),
            email: Email::parse("ash@pallet.town").unwrap(),
            address: "Route 1".to_string(),
            phone: "912345678".to_string(),
            password: PasswordDigest::new("Pikachu.25".to_string()),
            photo: None,
        }
    }

    #[test]
    fn test_serializes_with_stored_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["correo"], "ash@pallet.town");
        assert_eq!(json["rut"], "12345678-9");
        assert_eq!(json["contrasena"], "Pikachu.25");
        assert!(json.get("photoUri").is_none());
    }

    #[test]
    fn test_reads_record_without_photo_field() {
        let raw = r#"{"nombre":"Misty","apellido":"Waterflower","rut":"9876543-K",
            "correo":"misty@cerulean.gym","direccion":"Cerulean","telefono":"987654321",
            "contrasena":"Starmie!x1"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.email.as_str(), "misty@cerulean.gym");
        assert_eq!(user.photo, None);
    }

    #[test]
    fn test_with_profile_keeps_identity_and_password() {
        let user = sample();
        let edited = user.with_profile(UserProfile {
            first_name: "Satoshi".to_string(),
            phone: "900000000".to_string(),
            photo: Some("content://photos/1".to_string()),
            ..UserProfile::from(&user)
        });

        assert_eq!(edited.email, user.email);
        assert_eq!(edited.password, user.password);
        assert_eq!(edited.first_name, "Satoshi");
        assert_eq!(edited.phone, "900000000");
        assert_eq!(edited.full_name(), "Satoshi Ketchum");
    }
}
