//! `rapport:*` channels

use crate::{
    error::ServiceResult,
    models::report::{CsvExport, GarantiKundeRapport, RapportPeriode, SalgRapport, SkadeRapport},
    services::csv_export,
    AppState,
};

fn filnavn(prefix: &str, periode: &RapportPeriode) -> String {
    format!(
        "{}_{}_{}.csv",
        prefix,
        periode.fra.format("%Y%m%d"),
        periode.til.format("%Y%m%d")
    )
}

pub async fn salg(state: &AppState, periode: RapportPeriode) -> ServiceResult<SalgRapport> {
    state.report_api.salg(&periode).await
}

pub async fn skader(state: &AppState, periode: RapportPeriode) -> ServiceResult<SkadeRapport> {
    state.report_api.skader(&periode).await
}

pub async fn garantikunder(state: &AppState, periode: RapportPeriode) -> ServiceResult<GarantiKundeRapport> {
    state.report_api.garantikunder(&periode).await
}

pub async fn eksporter_kunder_csv(state: &AppState, periode: RapportPeriode) -> ServiceResult<CsvExport> {
    let rows = state.report_api.garantikunde_rader(&periode).await?;
    let innhold = csv_export::kunder_csv(&rows)?;
    tracing::info!(rows = rows.len(), "Customer CSV exported");
    Ok(CsvExport {
        filnavn: filnavn("garantikunder", &periode),
        innhold,
    })
}

pub async fn eksporter_skader_csv(state: &AppState, periode: RapportPeriode) -> ServiceResult<CsvExport> {
    let rows = state.report_api.skade_rader(&periode).await?;
    let innhold = csv_export::skader_csv(&rows)?;
    tracing::info!(rows = rows.len(), "Claims CSV exported");
    Ok(CsvExport {
        filnavn: filnavn("skader", &periode),
        innhold,
    })
}
