//! Image intake and retrieval.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use metrics::counter;
use thiserror::Error;
use tracing::info;

use crate::application::repos::{ImagesRepo, NewImage, RepoError};
use crate::domain::entities::ImageRecord;
use crate::domain::types::LinkedTableType;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no images were supplied")]
    NoImages,
    #[error("linked key must be a positive identifier")]
    NoLinkedKey,
    #[error("image payload is not valid base64")]
    InvalidImage,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ImageError {
    /// Wire code for client-visible failures; repo errors have none.
    pub fn wire_code(&self) -> Option<&'static str> {
        match self {
            ImageError::NoImages => Some("NO_IMAGES"),
            ImageError::NoLinkedKey => Some("NO_LINKED_KEY"),
            ImageError::InvalidImage => Some("INVALID_IMAGE"),
            ImageError::Repo(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaveImagesCommand {
    pub images: Vec<String>,
    pub linked_key: i32,
    pub linked_table_type: LinkedTableType,
}

#[derive(Clone)]
pub struct ImageService {
    images: Arc<dyn ImagesRepo>,
}

impl ImageService {
    pub fn new(images: Arc<dyn ImagesRepo>) -> Self {
        Self { images }
    }

    /// Decode and store a batch of base64 images for one linked entity.
    ///
    /// Payloads may arrive as bare base64 or as data URLs; anything before the
    /// first comma is discarded before decoding.
    pub async fn save_images(
        &self,
        command: SaveImagesCommand,
    ) -> Result<Vec<ImageRecord>, ImageError> {
        if command.images.is_empty() {
            return Err(ImageError::NoImages);
        }
        if command.linked_key < 1 {
            return Err(ImageError::NoLinkedKey);
        }

        let mut decoded = Vec::with_capacity(command.images.len());
        for raw in &command.images {
            let payload = match raw.split_once(',') {
                Some((_prefix, data)) => data,
                None => raw.as_str(),
            };
            let blob = BASE64
                .decode(payload.trim())
                .map_err(|_| ImageError::InvalidImage)?;
            if blob.is_empty() {
                return Err(ImageError::InvalidImage);
            }
            decoded.push(NewImage {
                linked_key: command.linked_key,
                linked_table_type: command.linked_table_type,
                blob,
            });
        }

        let records = self.images.insert_images(&decoded).await?;
        counter!("prenota_images_stored_total").increment(records.len() as u64);
        info!(
            count = records.len(),
            linked_key = command.linked_key,
            "stored image batch"
        );
        Ok(records)
    }

    pub async fn list_for_entity(
        &self,
        linked_table_type: LinkedTableType,
        linked_key: i32,
    ) -> Result<Vec<ImageRecord>, ImageError> {
        self.images
            .list_for_entity(linked_table_type, linked_key)
            .await
            .map_err(ImageError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct MemoryImagesRepo {
        rows: Mutex<Vec<(NewImage, Uuid)>>,
    }

    #[async_trait]
    impl ImagesRepo for MemoryImagesRepo {
        async fn insert_images(&self, images: &[NewImage]) -> Result<Vec<ImageRecord>, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            let mut inserted = Vec::new();
            for image in images {
                let id = Uuid::new_v4();
                rows.push((image.clone(), id));
                inserted.push(ImageRecord {
                    id,
                    linked_key: image.linked_key,
                    linked_table_type: image.linked_table_type,
                    size_bytes: image.blob.len() as i64,
                    created_at: OffsetDateTime::now_utc(),
                });
            }
            Ok(inserted)
        }

        async fn list_for_entity(
            &self,
            linked_table_type: LinkedTableType,
            linked_key: i32,
        ) -> Result<Vec<ImageRecord>, RepoError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|(image, _)| {
                    image.linked_table_type == linked_table_type && image.linked_key == linked_key
                })
                .map(|(image, id)| ImageRecord {
                    id: *id,
                    linked_key: image.linked_key,
                    linked_table_type: image.linked_table_type,
                    size_bytes: image.blob.len() as i64,
                    created_at: OffsetDateTime::now_utc(),
                })
                .collect())
        }
    }

    fn service() -> (ImageService, Arc<MemoryImagesRepo>) {
        let repo = Arc::new(MemoryImagesRepo::default());
        (ImageService::new(repo.clone()), repo)
    }

    #[test]
    fn client_visible_failures_keep_bare_wire_literals() {
        assert_eq!(ImageError::NoImages.wire_code(), Some("NO_IMAGES"));
        assert_eq!(ImageError::NoLinkedKey.wire_code(), Some("NO_LINKED_KEY"));
        assert_eq!(ImageError::InvalidImage.wire_code(), Some("INVALID_IMAGE"));
        assert_eq!(
            ImageError::Repo(RepoError::NotFound).wire_code(),
            None
        );
    }

    #[tokio::test]
    async fn empty_batch_is_refused() {
        let (svc, _) = service();
        let result = svc
            .save_images(SaveImagesCommand {
                images: Vec::new(),
                linked_key: 1,
                linked_table_type: LinkedTableType::Product,
            })
            .await;
        assert!(matches!(result, Err(ImageError::NoImages)));
    }

    #[tokio::test]
    async fn non_positive_linked_key_is_refused() {
        let (svc, _) = service();
        let result = svc
            .save_images(SaveImagesCommand {
                images: vec!["aGVsbG8=".to_string()],
                linked_key: 0,
                linked_table_type: LinkedTableType::Product,
            })
            .await;
        assert!(matches!(result, Err(ImageError::NoLinkedKey)));
    }

    #[tokio::test]
    async fn data_url_prefix_is_stripped_before_decoding() {
        let (svc, _) = service();
        let records = svc
            .save_images(SaveImagesCommand {
                images: vec!["data:image/png;base64,aGVsbG8=".to_string()],
                linked_key: 4,
                linked_table_type: LinkedTableType::Category,
            })
            .await
            .expect("save succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size_bytes, 5);
    }

    #[tokio::test]
    async fn invalid_base64_is_refused() {
        let (svc, repo) = service();
        let result = svc
            .save_images(SaveImagesCommand {
                images: vec!["aGVsbG8=".to_string(), "!!not-base64!!".to_string()],
                linked_key: 4,
                linked_table_type: LinkedTableType::Product,
            })
            .await;
        assert!(matches!(result, Err(ImageError::InvalidImage)));
        assert!(repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_filters_by_entity() {
        let (svc, _) = service();
        svc.save_images(SaveImagesCommand {
            images: vec!["aGVsbG8=".to_string()],
            linked_key: 4,
            linked_table_type: LinkedTableType::Product,
        })
        .await
        .expect("save succeeds");

        let product_images = svc
            .list_for_entity(LinkedTableType::Product, 4)
            .await
            .expect("list succeeds");
        let category_images = svc
            .list_for_entity(LinkedTableType::Category, 4)
            .await
            .expect("list succeeds");

        assert_eq!(product_images.len(), 1);
        assert!(category_images.is_empty());
    }
}
