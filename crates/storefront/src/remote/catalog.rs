//! Main service product client.

use tcg_store_core::ProductId;
use tracing::instrument;
use url::Url;

use super::models::ProductResponse;
use super::{RemoteError, check, http_client, image_url, read_json};
use crate::config::ApiConfig;
use crate::models::Product;

/// Client for the product endpoints of the main service.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogApi {
    /// Create a new product client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        Ok(Self {
            client: http_client()?,
            base_url: config.main_base_url.clone(),
        })
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns any request or API error.
    pub async fn list(&self) -> Result<Vec<ProductResponse>, RemoteError> {
        let response = self.client.get(self.endpoint("api/productos")?).send().await?;
        read_json(response).await
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns any request or API error.
    pub async fn get(&self, id: ProductId) -> Result<ProductResponse, RemoteError> {
        let response = self
            .client
            .get(self.endpoint(&format!("api/productos/{id}"))?)
            .send()
            .await?;
        read_json(response).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns any request or API error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.endpoint(&format!("api/productos/{id}"))?)
            .send()
            .await?;
        check(response).await?;
        tracing::info!("product deleted");
        Ok(())
    }

    /// All products as cart-ready snapshots with absolute image URLs.
    ///
    /// # Errors
    ///
    /// Returns any request or API error.
    pub async fn products(&self) -> Result<Vec<Product>, RemoteError> {
        self.list()
            .await?
            .into_iter()
            .map(|p| {
                let image = self.image_url(&p.imagen)?;
                Ok(p.into_product(image.into()))
            })
            .collect()
    }

    /// Absolute URL of a server image path.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Url` if the path cannot be joined.
    pub fn image_url(&self, path: &str) -> Result<Url, RemoteError> {
        image_url(&self.base_url, path)
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        Ok(self.base_url.join(path)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tcg_store_core::Price;

    use super::*;
    use crate::remote::test_server::serve;

    const PRODUCTS: &str = r#"[
        {"id":1,"nombre":"Magic The Gathering: Murders at Karlov Manor","descripcion":"Bundle con cartas de Magic","precio":78000,"imagen":"/uploads/magic-bundle.jpg","hover":"/uploads/magic-bundle-hover.jpg","oferta":"NUEVO"},
        {"id":3,"nombre":"Pokémon Paradox Rift Bundle","descripcion":"Bundle de cartas Pokémon","precio":40000,"imagen":"/uploads/pokemon-bundle.jpg","hover":null,"oferta":"OFERTA"}
    ]"#;

    fn api(base_url: Url) -> CatalogApi {
        CatalogApi::new(&ApiConfig {
            auth_base_url: base_url.clone(),
            main_base_url: base_url,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_products_resolves_images() {
        let (url, server) = serve(vec![(200, PRODUCTS)]).await;
        let api = api(url.clone());

        let products = api.products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, Some(ProductId::new(1)));
        assert_eq!(products[0].price, Price::new(78_000));
        assert_eq!(
            products[1].image,
            format!("{url}uploads/pokemon-bundle.jpg")
        );
        assert!(server.await.unwrap()[0].starts_with("GET /api/productos "));
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let (url, _server) = serve(vec![(404, r#"{"mensaje":"Producto no encontrado"}"#)]).await;

        let err = api(url).get(ProductId::new(99)).await.unwrap_err();

        assert_eq!(err.user_message(), "Producto no encontrado");
    }

    #[tokio::test]
    async fn test_delete_sends_delete() {
        let (url, server) = serve(vec![(204, "")]).await;

        api(url).delete(ProductId::new(3)).await.unwrap();

        assert!(server.await.unwrap()[0].starts_with("DELETE /api/productos/3 "));
    }
}
