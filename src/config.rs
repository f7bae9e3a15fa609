//! Runtime configuration read from the environment (`.env` is loaded by `main`)

use std::env;

use crate::error::ConfigError;

/// Which backend stores uploaded documents
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStorageKind {
    Azure,
    Memory,
}

/// Service-principal credentials plus where to find the storage key
#[derive(Debug, Clone)]
pub struct AzureConfig {
    pub storage_account: String,
    pub key_vault_url: String,
    pub storage_key_secret_name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub run_migrations: bool,
    pub report_api_url: Option<String>,
    pub report_api_key: Option<String>,
    pub report_cache_ttl_secs: u64,
    pub document_storage: DocumentStorageKind,
    pub document_container: String,
    pub azure: Option<AzureConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let bind_address = optional("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:3000".to_string());

        let run_migrations = match optional("RUN_MIGRATIONS") {
            None => true,
            Some(value) => parse_bool("RUN_MIGRATIONS", &value)?,
        };

        let report_cache_ttl_secs = match optional("REPORT_CACHE_TTL_SECS") {
            None => 300,
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "REPORT_CACHE_TTL_SECS",
                value,
            })?,
        };

        let azure = azure_from_env()?;

        let document_storage = match optional("DOCUMENT_STORAGE").as_deref() {
            Some("azure") => DocumentStorageKind::Azure,
            Some("memory") => DocumentStorageKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "DOCUMENT_STORAGE",
                    value: other.to_string(),
                })
            }
            None if azure.is_some() => DocumentStorageKind::Azure,
            None => DocumentStorageKind::Memory,
        };

        if document_storage == DocumentStorageKind::Azure && azure.is_none() {
            return Err(ConfigError::Missing("AZURE_STORAGE_ACCOUNT"));
        }

        Ok(Self {
            database_url,
            bind_address,
            run_migrations,
            report_api_url: optional("REPORT_API_URL"),
            report_api_key: optional("REPORT_API_KEY"),
            report_cache_ttl_secs,
            document_storage,
            document_container: optional("DOCUMENT_CONTAINER")
                .unwrap_or_else(|| "garanti-dokumenter".to_string()),
            azure,
        })
    }
}

/// All-or-nothing: a partially configured Azure block is an error
fn azure_from_env() -> Result<Option<AzureConfig>, ConfigError> {
    let Some(storage_account) = optional("AZURE_STORAGE_ACCOUNT") else {
        return Ok(None);
    };

    Ok(Some(AzureConfig {
        storage_account,
        key_vault_url: required("AZURE_KEY_VAULT_URL")?,
        storage_key_secret_name: required("AZURE_STORAGE_KEY_SECRET_NAME")?,
        tenant_id: required("AZURE_TENANT_ID")?,
        client_id: required("AZURE_CLIENT_ID")?,
        client_secret: required("AZURE_CLIENT_SECRET")?,
    }))
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "ja" => Ok(true),
        "0" | "false" | "no" | "nei" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "Ja").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "kanskje").is_err());
    }
}
