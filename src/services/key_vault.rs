//! Azure Key Vault secret lookup with service-principal credentials
//!
//! Secrets are returned to the caller and never written to disk or logs.

use reqwest::Client;
use serde::Deserialize;

use crate::config::AzureConfig;
use crate::error::{ServiceError, ServiceResult};

const LOGIN_URL: &str = "https://login.microsoftonline.com";
const VAULT_SCOPE: &str = "https://vault.azure.net/.default";
const API_VERSION: &str = "7.4";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    value: String,
}

#[derive(Clone)]
pub struct KeyVaultClient {
    client: Client,
    vault_url: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl KeyVaultClient {
    pub fn new(client: Client, config: &AzureConfig) -> Self {
        Self {
            client,
            vault_url: config.key_vault_url.trim_end_matches('/').to_string(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    async fn access_token(&self) -> ServiceResult<String> {
        let url = format!("{}/{}/oauth2/v2.0/token", LOGIN_URL, self.tenant_id);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", VAULT_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| infrastructure("token request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "Azure AD token request rejected");
            return Err(ServiceError::Infrastructure(
                "Kunne ikke autentisere mot Azure".to_string(),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| infrastructure("token response unreadable", e))?;
        Ok(token.access_token)
    }

    pub async fn get_secret(&self, name: &str) -> ServiceResult<String> {
        let token = self.access_token().await?;
        let url = format!("{}/secrets/{}?api-version={}", self.vault_url, name, API_VERSION);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| infrastructure("secret request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, secret = name, "Key Vault secret lookup rejected");
            return Err(ServiceError::Infrastructure(format!(
                "Hemmeligheten «{}» kunne ikke hentes fra Key Vault",
                name
            )));
        }

        let secret: SecretResponse = response
            .json()
            .await
            .map_err(|e| infrastructure("secret response unreadable", e))?;
        tracing::info!(secret = name, "Secret loaded from Key Vault");
        Ok(secret.value)
    }
}

fn infrastructure(context: &str, err: reqwest::Error) -> ServiceError {
    tracing::error!(error = %err, "Key Vault: {}", context);
    ServiceError::Infrastructure("Kunne ikke kontakte Azure Key Vault".to_string())
}
