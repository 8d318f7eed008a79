use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ImagesRepo, NewImage, RepoError};
use crate::domain::entities::ImageRecord;
use crate::domain::types::LinkedTableType;

use super::{PostgresRepositories, util::map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    linked_key: i32,
    linked_table_type: LinkedTableType,
    size_bytes: i64,
    created_at: OffsetDateTime,
}

impl From<ImageRow> for ImageRecord {
    fn from(row: ImageRow) -> Self {
        Self {
            id: row.id,
            linked_key: row.linked_key,
            linked_table_type: row.linked_table_type,
            size_bytes: row.size_bytes,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ImagesRepo for PostgresRepositories {
    async fn insert_images(&self, images: &[NewImage]) -> Result<Vec<ImageRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let mut inserted = Vec::with_capacity(images.len());

        for image in images {
            let row = sqlx::query_as::<_, ImageRow>(
                "INSERT INTO images (id, linked_key, linked_table_type, blob) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, linked_key, linked_table_type, \
                           octet_length(blob)::BIGINT AS size_bytes, created_at",
            )
            .bind(Uuid::new_v4())
            .bind(image.linked_key)
            .bind(image.linked_table_type)
            .bind(image.blob.as_slice())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            inserted.push(ImageRecord::from(row));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(inserted)
    }

    async fn list_for_entity(
        &self,
        linked_table_type: LinkedTableType,
        linked_key: i32,
    ) -> Result<Vec<ImageRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ImageRow>(
            "SELECT id, linked_key, linked_table_type, \
                    octet_length(blob)::BIGINT AS size_bytes, created_at \
             FROM images \
             WHERE linked_table_type = $1 AND linked_key = $2 \
             ORDER BY created_at",
        )
        .bind(linked_table_type)
        .bind(linked_key)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ImageRecord::from).collect())
    }
}
