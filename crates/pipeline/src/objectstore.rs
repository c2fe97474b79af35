//! Local object store.
//!
//! Downloads input images over HTTP (or straight off the filesystem
//! for local paths) and persists outputs as PNG files under a local
//! directory, served under a configured public base URL.

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};

use crate::traits::ObjectStore;
use crate::PipelineError;

pub struct LocalObjectStore {
    client: reqwest::Client,
    output_dir: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(output_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            output_dir: output_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| PipelineError::Download(e.to_string()))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| PipelineError::Download(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(url)
                .await
                .map_err(|e| PipelineError::Download(format!("{url}: {e}")))
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn download(&self, url: &str) -> Result<RgbImage, PipelineError> {
        let bytes = self.fetch_bytes(url).await?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| PipelineError::Download(format!("{url}: {e}")))?;
        Ok(image.to_rgb8())
    }

    async fn upload(&self, job_id: &str, image: &RgbImage) -> Result<String, PipelineError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        let mut png = Vec::new();
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| PipelineError::Upload(e.to_string()))?;

        let path = self.output_dir.join(format!("{job_id}.png"));
        tokio::fs::write(&path, &png)
            .await
            .map_err(|e| PipelineError::Upload(format!("{}: {e}", path.display())))?;

        tracing::debug!(job_id = %job_id, path = %path.display(), "output image persisted");
        Ok(format!("{}/{}.png", self.public_base_url, job_id))
    }
}
