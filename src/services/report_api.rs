//! Client for the external reporting API
//!
//! Rows are normalized on arrival and cached per (kind, fra, til).

use chrono::NaiveDate;
use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};
use crate::models::report::{
    GarantiKundeRad, GarantiKundeRapport, NormalizeText, RapportPeriode, SalgRad, SalgRapport,
    SkadeRad, SkadeRapport,
};
use crate::services::report_aggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RapportType {
    Salg,
    Skader,
    GarantiKunder,
}

impl RapportType {
    fn path(&self) -> &'static str {
        match self {
            RapportType::Salg => "salg",
            RapportType::Skader => "skader",
            RapportType::GarantiKunder => "garantikunder",
        }
    }
}

#[derive(Debug, Clone)]
enum Rader {
    Salg(Arc<Vec<SalgRad>>),
    Skader(Arc<Vec<SkadeRad>>),
    GarantiKunder(Arc<Vec<GarantiKundeRad>>),
}

type CacheKey = (RapportType, NaiveDate, NaiveDate);

#[derive(Clone)]
pub struct ReportApiService {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    cache: Arc<Cache<CacheKey, Rader>>,
}

pub fn validate_periode(periode: &RapportPeriode) -> ServiceResult<()> {
    if periode.fra > periode.til {
        return Err(ServiceError::validation("fra", "kan ikke være etter til-dato"));
    }
    Ok(())
}

impl ReportApiService {
    pub fn new(base_url: Option<String>, api_key: Option<String>, cache_ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            client: Client::new(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            api_key,
            cache: Arc::new(cache),
        }
    }

    async fn fetch<T>(&self, kind: RapportType, periode: &RapportPeriode) -> ServiceResult<Vec<T>>
    where
        T: DeserializeOwned + NormalizeText,
    {
        validate_periode(periode)?;
        let Some(base_url) = &self.base_url else {
            return Err(ServiceError::Infrastructure(
                "Rapport-API er ikke konfigurert".to_string(),
            ));
        };

        tracing::info!(kind = kind.path(), fra = %periode.fra, til = %periode.til, "Fetching report rows");

        let url = format!("{}/{}", base_url, kind.path());
        let mut request = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[
                ("fra", periode.fra.format("%Y-%m-%d").to_string()),
                ("til", periode.til.format("%Y-%m-%d").to_string()),
            ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| api_error(kind, e))?;
        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(kind = kind.path(), %status, "Report API returned an error");
            return Err(ServiceError::Infrastructure(format!(
                "Rapport-API svarte med feil ({})",
                status
            )));
        }

        let rows: Vec<T> = response.json().await.map_err(|e| api_error(kind, e))?;
        tracing::debug!(kind = kind.path(), rows = rows.len(), "Report rows received");
        Ok(rows.into_iter().map(NormalizeText::normalize).collect())
    }

    pub async fn salg_rader(&self, periode: &RapportPeriode) -> ServiceResult<Arc<Vec<SalgRad>>> {
        let key = (RapportType::Salg, periode.fra, periode.til);
        if let Some(Rader::Salg(rows)) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for salg {}..{}", periode.fra, periode.til);
            return Ok(rows);
        }
        let rows = Arc::new(self.fetch::<SalgRad>(RapportType::Salg, periode).await?);
        self.cache.insert(key, Rader::Salg(rows.clone())).await;
        Ok(rows)
    }

    pub async fn skade_rader(&self, periode: &RapportPeriode) -> ServiceResult<Arc<Vec<SkadeRad>>> {
        let key = (RapportType::Skader, periode.fra, periode.til);
        if let Some(Rader::Skader(rows)) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for skader {}..{}", periode.fra, periode.til);
            return Ok(rows);
        }
        let rows = Arc::new(self.fetch::<SkadeRad>(RapportType::Skader, periode).await?);
        self.cache.insert(key, Rader::Skader(rows.clone())).await;
        Ok(rows)
    }

    pub async fn garantikunde_rader(&self, periode: &RapportPeriode) -> ServiceResult<Arc<Vec<GarantiKundeRad>>> {
        let key = (RapportType::GarantiKunder, periode.fra, periode.til);
        if let Some(Rader::GarantiKunder(rows)) = self.cache.get(&key).await {
            tracing::debug!("Cache hit for garantikunder {}..{}", periode.fra, periode.til);
            return Ok(rows);
        }
        let rows = Arc::new(
            self.fetch::<GarantiKundeRad>(RapportType::GarantiKunder, periode)
                .await?,
        );
        self.cache.insert(key, Rader::GarantiKunder(rows.clone())).await;
        Ok(rows)
    }

    pub async fn salg(&self, periode: &RapportPeriode) -> ServiceResult<SalgRapport> {
        Ok(report_aggregator::aggregate_salg(&self.salg_rader(periode).await?))
    }

    pub async fn skader(&self, periode: &RapportPeriode) -> ServiceResult<SkadeRapport> {
        Ok(report_aggregator::aggregate_skader(&self.skade_rader(periode).await?))
    }

    pub async fn garantikunder(&self, periode: &RapportPeriode) -> ServiceResult<GarantiKundeRapport> {
        Ok(report_aggregator::aggregate_garantikunder(
            &self.garantikunde_rader(periode).await?,
        ))
    }
}

fn api_error(kind: RapportType, err: reqwest::Error) -> ServiceError {
    tracing::error!(kind = kind.path(), error = %err, "Report API request failed");
    ServiceError::Infrastructure("Kunne ikke hente data fra rapport-API".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periode(fra: &str, til: &str) -> RapportPeriode {
        RapportPeriode {
            fra: fra.parse().unwrap(),
            til: til.parse().unwrap(),
        }
    }

    #[test]
    fn test_periode_order() {
        assert!(validate_periode(&periode("2026-01-01", "2026-01-31")).is_ok());
        assert!(validate_periode(&periode("2026-01-01", "2026-01-01")).is_ok());
        assert!(matches!(
            validate_periode(&periode("2026-02-01", "2026-01-01")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_api_is_infrastructure_error() {
        let service = ReportApiService::new(None, None, 60);
        let err = service.salg(&periode("2026-01-01", "2026-01-31")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn test_reversed_periode_fails_before_request() {
        let service = ReportApiService::new(Some("http://127.0.0.1:9".to_string()), None, 60);
        let err = service.skader(&periode("2026-03-01", "2026-01-01")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
