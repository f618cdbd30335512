use async_trait::async_trait;
use lodge_core::{BackendError, ObjectStore};
use tracing::debug;

use crate::http::{send, BackendClient};

/// [`ObjectStore`] over the backend's storage endpoint (`/storage/v1`).
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: BackendClient,
}

impl StorageClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        debug!(bucket, path, size = bytes.len(), "upload");
        let url = self.client.url(&format!("storage/v1/object/{}/{}", bucket, path));
        let request = self
            .client
            .authorize(self.client.http().post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes);
        send(request).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.client
            .url(&format!("storage/v1/object/public/{}/{}", bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::BackendConfig;
    use lodge_shared::Masked;

    #[test]
    fn test_public_url() {
        let client = BackendClient::new(&BackendConfig {
            url: "https://project.example.co".into(),
            anon_key: Masked::from("anon"),
            timeout_seconds: 5,
        })
        .unwrap();
        let storage = StorageClient::new(client);
        assert_eq!(
            storage.public_url("logos", "gh/1700000000000-logo.png"),
            "https://project.example.co/storage/v1/object/public/logos/gh/1700000000000-logo.png"
        );
    }
}
