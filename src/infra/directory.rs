//! HTTP client for the external product directory.

use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use tracing::warn;
use url::Url;

use crate::application::directory::{DirectoryLookup, ProductDirectory, parse_snapshot};
use crate::config::DirectorySettings;
use crate::infra::error::InfraError;

pub struct HttpProductDirectory {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpProductDirectory {
    pub fn new(settings: &DirectorySettings) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build directory client: {err}"))
            })?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl ProductDirectory for HttpProductDirectory {
    /// Look up one product. Any transport failure, timeout, non-JSON body, or
    /// unexpected status degrades to `NotFound`; the directory being down must
    /// not fail a whole reservation batch.
    async fn fetch(&self, product_id: i32) -> DirectoryLookup {
        let url = match self.base_url.join(&format!("api/product/{product_id}")) {
            Ok(url) => url,
            Err(err) => {
                warn!(product_id, error = %err, "directory URL could not be built");
                return DirectoryLookup::NotFound;
            }
        };

        let started = Instant::now();
        let lookup = match self.client.get(url).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => parse_snapshot(&body),
                Err(err) => {
                    warn!(product_id, error = %err, "directory response body unreadable");
                    DirectoryLookup::NotFound
                }
            },
            Err(err) => {
                warn!(product_id, error = %err, "directory lookup failed");
                DirectoryLookup::NotFound
            }
        };
        histogram!("prenota_directory_lookup_ms")
            .record(started.elapsed().as_secs_f64() * 1000.0);

        lookup
    }
}
