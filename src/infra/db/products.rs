use async_trait::async_trait;
use sqlx::query_scalar;
use time::{Date, OffsetDateTime};

use crate::application::repos::{ProductPageRequest, ProductsRepo, RepoError};
use crate::domain::entities::ProductRecord;
use crate::domain::types::ProductState;

use super::{PostgresRepositories, util::map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    catalog_number: i32,
    name: String,
    description: String,
    requires_approval: bool,
    status: ProductState,
    category: String,
    archived_since: Option<Date>,
    created_at: OffsetDateTime,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            catalog_number: row.catalog_number,
            name: row.name,
            description: row.description,
            requires_approval: row.requires_approval,
            status: row.status,
            category: row.category,
            archived_since: row.archived_since,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, catalog_number, name, description, requires_approval, \
     status, category, archived_since, created_at";

#[async_trait]
impl ProductsRepo for PostgresRepositories {
    async fn list_products(
        &self,
        page: ProductPageRequest,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit))
        .bind(i64::try_from(page.offset).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn count_products(&self) -> Result<u64, RepoError> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        count
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn find_product(&self, id: i32) -> Result<Option<ProductRecord>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ProductRecord::from))
    }
}
