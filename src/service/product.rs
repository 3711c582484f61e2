use std::sync::Arc;

use crate::error::Result;
use crate::model::{Product, ProductId};
use crate::store::CatalogGateway;

/// Read access to the catalog.
#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<dyn CatalogGateway>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn CatalogGateway>) -> Self {
        Self { catalog }
    }

    pub async fn get_product_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.catalog.find_by_id(id).await?)
    }

    pub async fn get_products(&self) -> Result<Vec<Product>> {
        Ok(self.catalog.find_all().await?)
    }
}
