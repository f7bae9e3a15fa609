//! IPC transport: `POST /ipc/{channel}` with one JSON params object
//!
//! Every call answers HTTP 200 with the `{success, data | error}` envelope.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::future::Future;

use crate::{
    error::{ServiceError, ServiceResult},
    handlers::{bruker, dokument, garanti, kalkulator, rapport, tilbud},
    models::common::IpcResponse,
    AppState,
};

/// Missing or `null` params are read as an empty object
pub fn parse_params<P: DeserializeOwned>(params: Value) -> ServiceResult<P> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params)
        .map_err(|e| ServiceError::Validation(format!("Ugyldige parametere: {}", e)))
}

async fn call<P, R, Fut>(params: Value, handler: impl FnOnce(P) -> Fut) -> ServiceResult<Value>
where
    P: DeserializeOwned,
    R: Serialize,
    Fut: Future<Output = ServiceResult<R>>,
{
    let req = parse_params(params)?;
    let result = handler(req).await?;
    serde_json::to_value(result)
        .map_err(|e| ServiceError::Infrastructure(format!("Kunne ikke serialisere svar: {}", e)))
}

pub async fn dispatch(state: &AppState, channel: &str, params: Value) -> ServiceResult<Value> {
    match channel {
        "garanti:createSak" => call(params, |r| garanti::create_sak(state, r)).await,
        "garanti:getSak" => call(params, |r| garanti::get_sak(state, r)).await,
        "garanti:getSakerForSelskap" => call(params, |r| garanti::get_saker_for_selskap(state, r)).await,

        "garanti:listSelskaper" => call(params, |r| garanti::list_selskaper(state, r)).await,
        "garanti:getSelskap" => call(params, |r| garanti::get_selskap(state, r)).await,
        "garanti:getSelskapByOrgnr" => call(params, |r| garanti::get_selskap_by_orgnr(state, r)).await,
        "garanti:createSelskap" => call(params, |r| garanti::create_selskap(state, r)).await,
        "garanti:updateSelskap" => call(params, |r| garanti::update_selskap(state, r)).await,
        "garanti:deleteSelskap" => call(params, |r| garanti::delete_selskap(state, r)).await,

        "garanti:getProsjekt" => call(params, |r| garanti::get_prosjekt(state, r)).await,
        "garanti:getProsjekterForSelskap" => {
            call(params, |r| garanti::get_prosjekter_for_selskap(state, r)).await
        }
        "garanti:createProsjekt" => call(params, |r| garanti::create_prosjekt(state, r)).await,
        "garanti:updateProsjekt" => call(params, |r| garanti::update_prosjekt(state, r)).await,
        "garanti:assignRadgiver" => call(params, |r| garanti::assign_radgiver(state, r)).await,
        "garanti:deleteProsjekt" => call(params, |r| garanti::delete_prosjekt(state, r)).await,

        "garanti:getHendelser" => call(params, |r| garanti::get_hendelser(state, r)).await,
        "garanti:getRammeForbruk" => call(params, |r| garanti::get_ramme_forbruk(state, r)).await,
        "garanti:validerRamme" => call(params, |r| garanti::valider_ramme(state, r)).await,

        "garanti:uploadDokument" => call(params, |r| dokument::upload_dokument(state, r)).await,
        "garanti:getDokumenter" => call(params, |r| dokument::get_dokumenter(state, r)).await,
        "garanti:getDokumentUrl" => call(params, |r| dokument::get_dokument_url(state, r)).await,
        "garanti:deleteDokument" => call(params, |r| dokument::delete_dokument(state, r)).await,

        "tilbud:getTilbud" => call(params, |r| tilbud::get_tilbud(state, r)).await,
        "tilbud:getTilbudForProsjekt" => call(params, |r| tilbud::get_tilbud_for_prosjekt(state, r)).await,
        "tilbud:createTilbud" => call(params, |r| tilbud::create_tilbud(state, r)).await,
        "tilbud:updateTilbud" => call(params, |r| tilbud::update_tilbud(state, r)).await,
        "tilbud:deleteTilbud" => call(params, |r| tilbud::delete_tilbud(state, r)).await,

        "tilbud:getBeregning" => call(params, |r| tilbud::get_beregning(state, r)).await,
        "tilbud:saveBeregning" => call(params, |r| tilbud::save_beregning(state, r)).await,

        "tilbud:getBenefisienter" => call(params, |r| tilbud::get_benefisienter(state, r)).await,
        "tilbud:createBenefisient" => call(params, |r| tilbud::create_benefisient(state, r)).await,
        "tilbud:updateBenefisient" => call(params, |r| tilbud::update_benefisient(state, r)).await,
        "tilbud:deactivateBenefisient" => call(params, |r| tilbud::deactivate_benefisient(state, r)).await,
        "tilbud:reactivateBenefisient" => call(params, |r| tilbud::reactivate_benefisient(state, r)).await,
        "tilbud:deleteBenefisient" => call(params, |r| tilbud::delete_benefisient(state, r)).await,

        "tilbud:getEnheter" => call(params, |r| tilbud::get_enheter(state, r)).await,
        "tilbud:createEnhet" => call(params, |r| tilbud::create_enhet(state, r)).await,
        "tilbud:updateEnhet" => call(params, |r| tilbud::update_enhet(state, r)).await,
        "tilbud:deleteEnhet" => call(params, |r| tilbud::delete_enhet(state, r)).await,
        "tilbud:genererEnheter" => call(params, |r| tilbud::generer_enheter(state, r)).await,

        "kalkulator:kjoeretoey" => call(params, kalkulator::kjoeretoey).await,
        "kalkulator:lastebil" => call(params, kalkulator::lastebil).await,

        "rapport:salg" => call(params, |r| rapport::salg(state, r)).await,
        "rapport:skader" => call(params, |r| rapport::skader(state, r)).await,
        "rapport:garantikunder" => call(params, |r| rapport::garantikunder(state, r)).await,
        "rapport:eksporterKunderCsv" => call(params, |r| rapport::eksporter_kunder_csv(state, r)).await,
        "rapport:eksporterSkaderCsv" => call(params, |r| rapport::eksporter_skader_csv(state, r)).await,

        "bruker:list" => call(params, |r| bruker::list(state, r)).await,
        "bruker:create" => call(params, |r| bruker::create(state, r)).await,
        "bruker:updateRolle" => call(params, |r| bruker::update_rolle(state, r)).await,
        "bruker:deactivate" => call(params, |r| bruker::deactivate(state, r)).await,

        _ => Err(ServiceError::NotFound(format!("Ukjent IPC-kanal: {}", channel))),
    }
}

/// Handler for POST /ipc/{channel}
pub async fn handle_ipc(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    body: Bytes,
) -> Json<IpcResponse> {
    let params = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%channel, error = %e, "Malformed IPC body");
                return Json(IpcResponse::err(format!("Ugyldig JSON: {}", e)));
            }
        }
    };

    match dispatch(&state, &channel, params).await {
        Ok(data) => Json(IpcResponse::ok(data)),
        Err(err) => {
            match &err {
                ServiceError::Database(_) | ServiceError::Infrastructure(_) => {
                    tracing::error!(%channel, error = %err, "IPC call failed")
                }
                _ => tracing::debug!(%channel, error = %err, "IPC call rejected"),
            }
            Json(IpcResponse::err(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::IdRequest;
    use crate::models::selskap::SelskapListQuery;

    #[test]
    fn test_null_params_become_empty_object() {
        let query: SelskapListQuery = parse_params(Value::Null).unwrap();
        assert!(query.sok.is_none());
    }

    #[test]
    fn test_bad_params_are_validation_errors() {
        let err = parse_params::<IdRequest>(serde_json::json!({"id": "ikke-en-uuid"})).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.starts_with("Ugyldige parametere")));
    }
}
