//! Catalog browsing and the self-hosted product directory endpoint.

use std::num::NonZeroU32;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::application::directory::ProductSnapshot;
use crate::application::repos::{ProductPageRequest, ProductsRepo, RepoError};
use crate::domain::entities::ProductRecord;

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<ProductRecord>,
    pub total: u64,
    pub page: u64,
    pub page_size: u32,
}

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductsRepo>,
    default_page_size: NonZeroU32,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductsRepo>, default_page_size: NonZeroU32) -> Self {
        Self {
            products,
            default_page_size,
        }
    }

    /// List one page of the catalog. Pages are 1-based; out-of-range inputs
    /// are clamped rather than rejected.
    pub async fn list_products(
        &self,
        page: Option<u64>,
        page_size: Option<u32>,
    ) -> Result<ProductPage, CatalogError> {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or_else(|| self.default_page_size.get())
            .clamp(1, MAX_PAGE_SIZE);

        let request = ProductPageRequest {
            limit: page_size,
            offset: (page - 1) * u64::from(page_size),
        };

        let items = self.products.list_products(request).await?;
        let total = self.products.count_products().await?;

        Ok(ProductPage {
            items,
            total,
            page,
            page_size,
        })
    }

    /// Directory-shaped view of one product, or `None` when it is unknown.
    pub async fn product_snapshot(
        &self,
        id: i32,
    ) -> Result<Option<ProductSnapshot>, CatalogError> {
        let record = self.products.find_product(id).await?;
        Ok(record.map(|record| ProductSnapshot {
            id: record.id,
            state: record.status,
            requires_approval: record.requires_approval,
        }))
    }
}
