//! Document blob storage
//!
//! Production uses Azure Blob Storage with SAS links signed locally from the
//! account key; the in-memory store backs tests and local development.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use reqwest::{Client, Url};
use sha2::Sha256;
use std::collections::HashMap;
use tokio::sync::OnceCell;

use crate::config::AzureConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::services::key_vault::KeyVaultClient;

/// Lifetime of generated read links
pub const SAS_TTL_MINUTES: i64 = 15;
const SAS_VERSION: &str = "2020-12-06";
const UPLOAD_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub url: String,
    pub container_name: String,
    pub blob_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Container new uploads go to
    fn container(&self) -> &str;

    async fn upload(&self, blob_name: &str, content_type: Option<&str>, data: Vec<u8>) -> ServiceResult<StoredBlob>;

    /// Time-limited read link for a stored blob
    async fn read_url(&self, container: &str, blob_name: &str) -> ServiceResult<SignedUrl>;

    async fn delete(&self, container: &str, blob_name: &str) -> ServiceResult<()>;
}

type HmacSha256 = Hmac<Sha256>;

/// Base64 HMAC-SHA256 of `string_to_sign` with the base64 account key
pub fn sign(account_key: &str, string_to_sign: &str) -> ServiceResult<String> {
    let key = BASE64
        .decode(account_key)
        .map_err(|_| ServiceError::Infrastructure("Lagringsnøkkelen har ugyldig format".to_string()))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|_| ServiceError::Infrastructure("Lagringsnøkkelen har ugyldig format".to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Service SAS string-to-sign for a single blob
pub fn blob_string_to_sign(
    account: &str,
    container: &str,
    blob_name: &str,
    permissions: &str,
    expiry: &str,
) -> String {
    let resource = format!("/blob/{}/{}/{}", account, container, blob_name);
    [
        permissions,
        "",
        expiry,
        resource.as_str(),
        "",
        "",
        "https",
        SAS_VERSION,
        "b",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n")
}

pub struct AzureBlobStorage {
    client: Client,
    account: String,
    container: String,
    key_vault: KeyVaultClient,
    key_secret_name: String,
    account_key: OnceCell<String>,
}

impl AzureBlobStorage {
    pub fn new(client: Client, config: &AzureConfig, container: String) -> Self {
        Self {
            key_vault: KeyVaultClient::new(client.clone(), config),
            client,
            account: config.storage_account.clone(),
            container,
            key_secret_name: config.storage_key_secret_name.clone(),
            account_key: OnceCell::new(),
        }
    }

    /// Fetched from Key Vault on first use and kept in memory
    async fn account_key(&self) -> ServiceResult<&str> {
        let key = self
            .account_key
            .get_or_try_init(|| self.key_vault.get_secret(&self.key_secret_name))
            .await?;
        Ok(key.as_str())
    }

    fn blob_url(&self, container: &str, blob_name: &str) -> String {
        format!("https://{}.blob.core.windows.net/{}/{}", self.account, container, blob_name)
    }

    async fn signed_url(
        &self,
        container: &str,
        blob_name: &str,
        permissions: &str,
        ttl: Duration,
    ) -> ServiceResult<SignedUrl> {
        let expires_at = Utc::now() + ttl;
        let expiry = expires_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let string_to_sign = blob_string_to_sign(&self.account, container, blob_name, permissions, &expiry);
        let signature = sign(self.account_key().await?, &string_to_sign)?;

        let url = Url::parse_with_params(
            &self.blob_url(container, blob_name),
            &[
                ("sv", SAS_VERSION),
                ("sp", permissions),
                ("se", expiry.as_str()),
                ("sr", "b"),
                ("spr", "https"),
                ("sig", signature.as_str()),
            ],
        )
        .map_err(|e| ServiceError::Infrastructure(format!("Ugyldig blob-adresse: {}", e)))?;

        Ok(SignedUrl {
            url: url.to_string(),
            expires_at,
        })
    }
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> ServiceError {
    tracing::error!(error = %err, "Blob storage: {}", context);
    ServiceError::Infrastructure("Dokumentlagringen er utilgjengelig".to_string())
}

#[async_trait]
impl BlobStorage for AzureBlobStorage {
    fn container(&self) -> &str {
        &self.container
    }

    async fn upload(&self, blob_name: &str, content_type: Option<&str>, data: Vec<u8>) -> ServiceResult<StoredBlob> {
        let signed = self
            .signed_url(&self.container, blob_name, "cw", Duration::minutes(UPLOAD_TTL_MINUTES))
            .await?;
        let size = data.len();

        let response = self
            .client
            .put(&signed.url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", content_type.unwrap_or("application/octet-stream"))
            .body(data)
            .send()
            .await
            .map_err(|e| storage_error("upload failed", e))?;

        if !response.status().is_success() {
            return Err(storage_error("upload rejected", response.status()));
        }

        tracing::info!(container = %self.container, blob = blob_name, size, "Blob uploaded");
        Ok(StoredBlob {
            url: self.blob_url(&self.container, blob_name),
            container_name: self.container.clone(),
            blob_name: blob_name.to_string(),
        })
    }

    async fn read_url(&self, container: &str, blob_name: &str) -> ServiceResult<SignedUrl> {
        self.signed_url(container, blob_name, "r", Duration::minutes(SAS_TTL_MINUTES))
            .await
    }

    async fn delete(&self, container: &str, blob_name: &str) -> ServiceResult<()> {
        let signed = self
            .signed_url(container, blob_name, "d", Duration::minutes(UPLOAD_TTL_MINUTES))
            .await?;
        let response = self
            .client
            .delete(&signed.url)
            .send()
            .await
            .map_err(|e| storage_error("delete failed", e))?;

        // Already gone counts as deleted
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(storage_error("delete rejected", response.status()));
        }
        tracing::info!(container, blob = blob_name, "Blob deleted");
        Ok(())
    }
}

/// Blobs kept in process memory
#[derive(Default)]
pub struct InMemoryBlobStorage {
    container: String,
    blobs: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryBlobStorage {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, container: &str, blob_name: &str) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .get(&(container.to_string(), blob_name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    fn container(&self) -> &str {
        &self.container
    }

    async fn upload(&self, blob_name: &str, _content_type: Option<&str>, data: Vec<u8>) -> ServiceResult<StoredBlob> {
        self.blobs
            .write()
            .insert((self.container.clone(), blob_name.to_string()), data);
        Ok(StoredBlob {
            url: format!("memory://{}/{}", self.container, blob_name),
            container_name: self.container.clone(),
            blob_name: blob_name.to_string(),
        })
    }

    /// Links are issued without a lookup, as SAS signing does
    async fn read_url(&self, container: &str, blob_name: &str) -> ServiceResult<SignedUrl> {
        let expires_at = Utc::now() + Duration::minutes(SAS_TTL_MINUTES);
        Ok(SignedUrl {
            url: format!(
                "memory://{}/{}?se={}",
                container,
                blob_name,
                expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            expires_at,
        })
    }

    async fn delete(&self, container: &str, blob_name: &str) -> ServiceResult<()> {
        self.blobs
            .write()
            .remove(&(container.to_string(), blob_name.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "bWVnbGVyLXRlc3Qta2V5LTAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn test_string_to_sign_layout() {
        let sts = blob_string_to_sign(
            "meglerstorage",
            "garanti-dokumenter",
            "abc-kontrakt.pdf",
            "r",
            "2026-03-01T12:15:00Z",
        );
        assert_eq!(sts.matches('\n').count(), 15);
        assert!(sts.starts_with("r\n\n2026-03-01T12:15:00Z\n/blob/meglerstorage/garanti-dokumenter/abc-kontrakt.pdf\n"));
    }

    #[test]
    fn test_sign_known_vector() {
        let sts = blob_string_to_sign(
            "meglerstorage",
            "garanti-dokumenter",
            "abc-kontrakt.pdf",
            "r",
            "2026-03-01T12:15:00Z",
        );
        assert_eq!(
            sign(TEST_KEY, &sts).unwrap(),
            "tt34SFb7u1IDuFxCpyGq1ZP3UksDtqhUgcbmjdjl37U="
        );
    }

    #[test]
    fn test_sign_rejects_bad_key() {
        assert!(matches!(sign("not base64!", "x"), Err(ServiceError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = InMemoryBlobStorage::new("garanti-dokumenter");
        let stored = storage.upload("id-fil.pdf", None, b"%PDF".to_vec()).await.unwrap();
        assert_eq!(stored.container_name, "garanti-dokumenter");
        assert_eq!(storage.get("garanti-dokumenter", "id-fil.pdf"), Some(b"%PDF".to_vec()));

        let link = storage.read_url("garanti-dokumenter", "id-fil.pdf").await.unwrap();
        let ttl = link.expires_at - Utc::now();
        assert!(ttl <= Duration::minutes(SAS_TTL_MINUTES) && ttl > Duration::minutes(14));

        storage.delete("garanti-dokumenter", "id-fil.pdf").await.unwrap();
        assert!(storage.is_empty());
    }
}
