//! Auth service client.

use std::collections::BTreeMap;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::instrument;
use url::Url;

use tcg_store_core::{Email, UserId};

use super::models::{AuthResponse, LoginRequest, RegisterRequest, UserListResponse, UserProfileResponse};
use super::{RemoteError, http_client, read_json};
use crate::config::ApiConfig;
use crate::models::LoginAttempt;
use crate::store::UserDirectory;

/// Client for the auth service.
///
/// Holds the bearer token of the current remote session in memory.
#[derive(Debug)]
pub struct AuthApi {
    client: reqwest::Client,
    base_url: Url,
    directory: UserDirectory,
    token: RwLock<Option<SecretString>>,
}

impl AuthApi {
    /// Create a new auth service client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, directory: UserDirectory) -> Result<Self, RemoteError> {
        Ok(Self {
            client: http_client()?,
            base_url: config.auth_base_url.clone(),
            directory,
            token: RwLock::new(None),
        })
    }

    /// Register an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Api` with the server's message on rejection.
    #[instrument(skip(self, request), fields(email = %request.correo_electronico))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, RemoteError> {
        let response = self
            .client
            .post(self.endpoint("api/auth/register")?)
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = read_json(response).await?;

        self.start_session(&auth).await?;
        tracing::info!("registered remotely");
        Ok(auth)
    }

    /// Log in and start a session.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Api` with the server's message on rejection.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: SecretString) -> Result<AuthResponse, RemoteError> {
        let request = LoginRequest {
            correo_electronico: email.to_string(),
            password,
        };
        let response = self
            .client
            .post(self.endpoint("api/auth/login")?)
            .json(&request)
            .send()
            .await?;
        let auth: AuthResponse = read_json(response).await?;

        self.start_session(&auth).await?;
        tracing::info!("logged in remotely");
        Ok(auth)
    }

    /// Drop the token and clear the session pointer.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Store` if the pointer cannot be removed.
    pub async fn logout(&self) -> Result<(), RemoteError> {
        *self.token.write().await = None;
        self.directory.clear_logged_in().await?;
        Ok(())
    }

    /// Whether a remote session is active.
    pub async fn has_session(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Profile of the logged-in account.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn profile(&self) -> Result<UserProfileResponse, RemoteError> {
        self.get_authorized("api/user/profile").await
    }

    /// All accounts (administrators only).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn users(&self) -> Result<Vec<UserListResponse>, RemoteError> {
        self.get_authorized("api/admin/users").await
    }

    /// Login attempt log (administrators only).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn login_attempts(&self) -> Result<Vec<LoginAttempt>, RemoteError> {
        self.get_authorized("api/admin/login-attempts").await
    }

    /// Dashboard summary of the logged-in account.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn dashboard(&self) -> Result<BTreeMap<String, String>, RemoteError> {
        self.get_authorized("api/user/dashboard").await
    }

    /// Administrator panel summary (administrators only).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn admin_panel(&self) -> Result<Map<String, Value>, RemoteError> {
        self.get_authorized("api/admin").await
    }

    /// Store statistics (administrators only).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    pub async fn stats(&self) -> Result<Map<String, Value>, RemoteError> {
        self.get_authorized("api/admin/stats").await
    }

    /// Delete an account (administrators only). Returns the server's reply.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NoSession` without a token, otherwise any
    /// request or API error.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<BTreeMap<String, String>, RemoteError> {
        let request = self
            .authorized(Method::DELETE, &format!("api/admin/users/{id}"))
            .await?;
        let reply = read_json(request.send().await?).await?;
        tracing::info!("user deleted remotely");
        Ok(reply)
    }

    async fn get_authorized<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, RemoteError> {
        let request = self.authorized(Method::GET, path).await?;
        read_json(request.send().await?).await
    }

    /// A request to `path` carrying the session's bearer token.
    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = self.endpoint(path)?;
        let token = self.token.read().await.clone().ok_or(RemoteError::NoSession)?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret()))
    }

    async fn start_session(&self, auth: &AuthResponse) -> Result<(), RemoteError> {
        *self.token.write().await = Some(auth.token.clone());
        self.directory
            .set_logged_in(&Email::from_stored(auth.correo_electronico.clone()))
            .await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        Ok(self.base_url.join(path)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::remote::test_server::serve;
    use crate::store::Preferences;

    const AUTH_OK: &str = r#"{"token":"abc.def.ghi","tipo":"Bearer","correoElectronico":"ash@pallet.town","nombreCompleto":"Ash Ketchum","role":"USER","mensaje":"Login exitoso"}"#;
    const PROFILE: &str = r#"{"id":7,"nombreCompleto":"Ash Ketchum","correoElectronico":"ash@pallet.town","role":"USER","fechaRegistro":"2025-01-01T00:00:00"}"#;

    fn api(base_url: Url) -> (UserDirectory, AuthApi) {
        let directory = UserDirectory::new(Preferences::in_memory());
        let config = ApiConfig {
            auth_base_url: base_url.clone(),
            main_base_url: base_url,
        };
        let api = AuthApi::new(&config, directory.clone()).unwrap();
        (directory, api)
    }

    #[tokio::test]
    async fn test_login_sets_pointer_and_token() {
        let (url, server) = serve(vec![(200, AUTH_OK), (200, PROFILE)]).await;
        let (directory, api) = api(url);

        let auth = api
            .login("ash@pallet.town", SecretString::from("Pikachu.25"))
            .await
            .unwrap();
        assert_eq!(auth.role, "USER");
        assert_eq!(
            directory.logged_in_email().unwrap().as_str(),
            "ash@pallet.town"
        );

        let profile = api.profile().await.unwrap();
        assert_eq!(profile.nombre_completo, "Ash Ketchum");

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("POST /api/auth/login "));
        assert!(requests[0].contains(r#""correoElectronico":"ash@pallet.town""#));
        assert!(requests[1].starts_with("GET /api/user/profile "));
        assert!(requests[1].to_lowercase().contains("authorization: bearer abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_rejected_login_reports_server_message() {
        let (url, _server) = serve(vec![(401, r#"{"mensaje":"Credenciales inválidas"}"#)]).await;
        let (directory, api) = api(url);

        let err = api
            .login("ash@pallet.town", SecretString::from("wrong"))
            .await
            .unwrap_err();

        assert!(matches!(&err, RemoteError::Api { status: 401, .. }));
        assert_eq!(err.user_message(), "Credenciales inválidas");
        assert_eq!(directory.logged_in_email(), None);
        assert!(!api.has_session().await);
    }

    #[tokio::test]
    async fn test_authorized_call_without_session() {
        let (_, api) = api(Url::parse("http://127.0.0.1:9/").unwrap());
        assert!(matches!(api.users().await, Err(RemoteError::NoSession)));
        assert!(matches!(api.stats().await, Err(RemoteError::NoSession)));
        assert!(matches!(
            api.delete_user(UserId::new(7)).await,
            Err(RemoteError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_admin_stats_and_delete_user() {
        let (url, server) = serve(vec![
            (200, AUTH_OK),
            (200, r#"{"totalUsuarios":12,"totalProductos":5,"intentosFallidos":3}"#),
            (200, r#"{"mensaje":"Usuario eliminado"}"#),
        ])
        .await;
        let (_, api) = api(url);
        api.login("admin@tcg.cl", SecretString::from("admin"))
            .await
            .unwrap();

        let stats = api.stats().await.unwrap();
        assert_eq!(stats["totalUsuarios"], 12);

        let reply = api.delete_user(UserId::new(7)).await.unwrap();
        assert_eq!(reply["mensaje"], "Usuario eliminado");

        let requests = server.await.unwrap();
        assert!(requests[1].starts_with("GET /api/admin/stats "));
        assert!(requests[2].starts_with("DELETE /api/admin/users/7 "));
        assert!(requests[2].to_lowercase().contains("authorization: bearer abc.def.ghi"));
    }

    #[tokio::test]
    async fn test_delete_user_reports_server_message() {
        let (url, _server) = serve(vec![
            (200, AUTH_OK),
            (404, r#"{"mensaje":"Usuario no encontrado"}"#),
        ])
        .await;
        let (_, api) = api(url);
        api.login("admin@tcg.cl", SecretString::from("admin"))
            .await
            .unwrap();

        let err = api.delete_user(UserId::new(99)).await.unwrap_err();

        assert!(matches!(&err, RemoteError::Api { status: 404, .. }));
        assert_eq!(err.user_message(), "Usuario no encontrado");
    }

    #[tokio::test]
    async fn test_dashboard_and_admin_panel() {
        let (url, server) = serve(vec![
            (200, AUTH_OK),
            (200, r#"{"mensaje":"Bienvenido Ash Ketchum"}"#),
            (200, r#"{"mensaje":"Panel de administración","usuarios":12}"#),
        ])
        .await;
        let (_, api) = api(url);
        api.login("ash@pallet.town", SecretString::from("Pikachu.25"))
            .await
            .unwrap();

        assert_eq!(api.dashboard().await.unwrap()["mensaje"], "Bienvenido Ash Ketchum");
        assert_eq!(api.admin_panel().await.unwrap()["usuarios"], 12);

        let requests = server.await.unwrap();
        assert!(requests[1].starts_with("GET /api/user/dashboard "));
        assert!(requests[2].starts_with("GET /api/admin "));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (url, _server) = serve(vec![(200, AUTH_OK)]).await;
        let (directory, api) = api(url);
        api.login("ash@pallet.town", SecretString::from("Pikachu.25"))
            .await
            .unwrap();

        api.logout().await.unwrap();

        assert!(!api.has_session().await);
        assert_eq!(directory.logged_in_email(), None);
    }
}
