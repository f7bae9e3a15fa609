//! Ramme (credit limit) consumption per selskap
//!
//! Consumption is the contract sum of produced tilbud in produced or
//! expanding prosjekter. A missing ramme counts as zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::prosjekt::{self, ProsjektStatus};
use crate::entities::tilbud::{self, TilbudStatus};
use crate::entities::{prelude::*, tilbud_beregning};
use crate::error::{ServiceError, ServiceResult};
use crate::models::ramme::{RammeFarge, RammeForbruk, RammeValidering};
use crate::services::selskap;

pub const GUL_GRENSE: Decimal = dec!(70);
pub const ROD_GRENSE: Decimal = dec!(90);
/// Remaining headroom below this share of the ramme triggers a warning
pub const NAER_GRENSE_ANDEL: Decimal = dec!(0.10);

pub fn farge(prosent: Decimal) -> RammeFarge {
    if prosent >= ROD_GRENSE {
        RammeFarge::Rod
    } else if prosent >= GUL_GRENSE {
        RammeFarge::Gul
    } else {
        RammeFarge::Gronn
    }
}

/// Used share of the ramme in percent, 2 decimals
pub fn forbruk_prosent(total_ramme: Decimal, forbrukt: Decimal) -> Decimal {
    if total_ramme <= Decimal::ZERO {
        return if forbrukt > Decimal::ZERO { dec!(100) } else { Decimal::ZERO };
    }
    (forbrukt / total_ramme * dec!(100)).round_dp(2)
}

pub fn compute_forbruk(
    selskap_id: Uuid,
    total_ramme: Decimal,
    forbrukt_av_andre: Decimal,
    gjeldende_prosjekt: Decimal,
    antall_produserte_prosjekter: usize,
) -> RammeForbruk {
    let forbrukt = forbrukt_av_andre + gjeldende_prosjekt;
    let prosent = forbruk_prosent(total_ramme, forbrukt);
    RammeForbruk {
        selskap_id,
        total_ramme,
        forbrukt_av_andre,
        gjeldende_prosjekt,
        tilgjengelig: total_ramme - forbrukt,
        forbruk_prosent: prosent,
        farge: farge(prosent),
        antall_produserte_prosjekter,
    }
}

/// Check a hypothetical amount `nytt_belop` against ramme `total_ramme` and
/// existing consumption `forbrukt`
pub fn validate_ramme(total_ramme: Decimal, forbrukt: Decimal, nytt_belop: Decimal) -> RammeValidering {
    let tilgjengelig_for = total_ramme - forbrukt;
    let tilgjengelig_etter = tilgjengelig_for - nytt_belop;
    let gyldig = tilgjengelig_etter >= Decimal::ZERO;
    let overskredet_belop = (nytt_belop - tilgjengelig_for).max(Decimal::ZERO);
    let naer_grense = gyldig && tilgjengelig_etter < total_ramme * NAER_GRENSE_ANDEL;

    let melding = if !gyldig {
        format!("Rammen overskrides med {} kr", overskredet_belop.normalize())
    } else if naer_grense {
        format!("Nær rammegrensen, {} kr gjenstår", tilgjengelig_etter.normalize())
    } else {
        "Innenfor rammen".to_string()
    };

    RammeValidering {
        gyldig,
        total_ramme,
        eksisterende_forbruk: forbrukt,
        nytt_belop,
        tilgjengelig_etter,
        overskredet_belop,
        naer_grense,
        melding,
    }
}

#[derive(Clone)]
pub struct RammeService {
    db: Arc<DatabaseConnection>,
}

impl RammeService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    async fn sum_kontraktssum(&self, tilbud_ids: Vec<Uuid>) -> ServiceResult<Decimal> {
        if tilbud_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let beregninger = TilbudBeregning::find()
            .filter(tilbud_beregning::Column::TilbudId.is_in(tilbud_ids))
            .all(self.db.as_ref())
            .await?;
        Ok(beregninger.iter().map(|b| b.kontraktssum).sum())
    }

    /// Consumption for the selskap; `ekskluder_prosjekt_id` is reported
    /// separately as the current prosjekt
    pub async fn get_forbruk(
        &self,
        selskap_id: Uuid,
        ekskluder_prosjekt_id: Option<Uuid>,
    ) -> ServiceResult<RammeForbruk> {
        let selskap = selskap::find_required(self.db.as_ref(), selskap_id).await?;
        let total_ramme = selskap.ramme.unwrap_or_default();

        let prosjekter = Prosjekt::find()
            .filter(prosjekt::Column::SelskapId.eq(selskap_id))
            .all(self.db.as_ref())
            .await?;

        if let Some(current) = ekskluder_prosjekt_id {
            if !prosjekter.iter().any(|p| p.id == current) {
                return Err(ServiceError::validation(
                    "ekskluderProsjektId",
                    "prosjektet tilhører ikke selskapet",
                ));
            }
        }

        let produserte: Vec<Uuid> = prosjekter
            .iter()
            .filter(|p| matches!(p.status, ProsjektStatus::Produsert | ProsjektStatus::Utvides))
            .filter(|p| Some(p.id) != ekskluder_prosjekt_id)
            .map(|p| p.id)
            .collect();

        let andre_tilbud: Vec<Uuid> = if produserte.is_empty() {
            Vec::new()
        } else {
            Tilbud::find()
                .filter(tilbud::Column::ProsjektId.is_in(produserte.clone()))
                .filter(tilbud::Column::Status.eq(TilbudStatus::Produsert))
                .all(self.db.as_ref())
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect()
        };
        let forbrukt_av_andre = self.sum_kontraktssum(andre_tilbud).await?;

        let gjeldende_prosjekt = match ekskluder_prosjekt_id {
            Some(current) => {
                let ids = Tilbud::find()
                    .filter(tilbud::Column::ProsjektId.eq(current))
                    .filter(tilbud::Column::Status.is_not_in([TilbudStatus::Avslatt, TilbudStatus::Utlopt]))
                    .all(self.db.as_ref())
                    .await?
                    .into_iter()
                    .map(|t| t.id)
                    .collect();
                self.sum_kontraktssum(ids).await?
            }
            None => Decimal::ZERO,
        };

        let forbruk = compute_forbruk(
            selskap_id,
            total_ramme,
            forbrukt_av_andre,
            gjeldende_prosjekt,
            produserte.len(),
        );
        tracing::debug!(
            %selskap_id,
            forbruk_prosent = %forbruk.forbruk_prosent,
            farge = ?forbruk.farge,
            "Ramme consumption computed"
        );
        Ok(forbruk)
    }

    pub async fn valider(
        &self,
        selskap_id: Uuid,
        nytt_belop: Decimal,
        ekskluder_prosjekt_id: Option<Uuid>,
    ) -> ServiceResult<RammeValidering> {
        if nytt_belop < Decimal::ZERO {
            return Err(ServiceError::validation("nyttBelop", "kan ikke være negativ"));
        }
        let forbruk = self.get_forbruk(selskap_id, ekskluder_prosjekt_id).await?;
        Ok(validate_ramme(forbruk.total_ramme, forbruk.forbrukt_av_andre, nytt_belop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::selskap as selskap_entity;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn selskap_model(ramme: Option<Decimal>) -> selskap_entity::Model {
        let now = Utc::now().fixed_offset();
        selskap_entity::Model {
            id: Uuid::new_v4(),
            organisasjonsnummer: "923609016".to_string(),
            navn: "Fjord Bygg AS".to_string(),
            gateadresse: None,
            postnummer: None,
            poststed: None,
            telefon: None,
            epost: None,
            kontaktperson: None,
            ramme,
            created_at: now,
            updated_at: now,
        }
    }

    fn prosjekt_model(selskap_id: Uuid, status: ProsjektStatus) -> prosjekt::Model {
        let now = Utc::now().fixed_offset();
        prosjekt::Model {
            id: Uuid::new_v4(),
            selskap_id,
            navn: "Sjøkanten".to_string(),
            prosjekttype: None,
            status,
            ansvarlig_radgiver_id: None,
            gateadresse: None,
            postnummer: None,
            poststed: None,
            kommentar: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn tilbud_model(prosjekt_id: Uuid) -> tilbud::Model {
        let now = Utc::now().fixed_offset();
        tilbud::Model {
            id: Uuid::new_v4(),
            prosjekt_id,
            tilbudsnummer: "T-2026-00000001".to_string(),
            produkttype: "Boligbyggergaranti".to_string(),
            status: TilbudStatus::Produsert,
            versjonsnummer: 1,
            kommentar: None,
            opprettet_av: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn beregning_model(tilbud_id: Uuid, kontraktssum: Decimal) -> tilbud_beregning::Model {
        let now = Utc::now().fixed_offset();
        tilbud_beregning::Model {
            id: Uuid::new_v4(),
            tilbud_id,
            kontraktssum,
            utforelsestid_maaneder: 12,
            garantitid_aar: 3,
            rente_utforelse: dec!(1),
            rente_garanti: dec!(0.5),
            etableringsgebyr: Decimal::ZERO,
            premie_utforelse: Decimal::ZERO,
            premie_garanti: Decimal::ZERO,
            total_premie: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_colour_thresholds() {
        assert_eq!(farge(dec!(0)), RammeFarge::Gronn);
        assert_eq!(farge(dec!(69.99)), RammeFarge::Gronn);
        assert_eq!(farge(dec!(70)), RammeFarge::Gul);
        assert_eq!(farge(dec!(89.99)), RammeFarge::Gul);
        assert_eq!(farge(dec!(90)), RammeFarge::Rod);
        assert_eq!(farge(dec!(140)), RammeFarge::Rod);
    }

    #[test]
    fn test_compute_forbruk() {
        let f = compute_forbruk(Uuid::nil(), dec!(10000000), dec!(6000000), dec!(1500000), 2);
        assert_eq!(f.tilgjengelig, dec!(2500000));
        assert_eq!(f.forbruk_prosent, dec!(75));
        assert_eq!(f.farge, RammeFarge::Gul);
    }

    #[test]
    fn test_missing_ramme_counts_as_zero() {
        let f = compute_forbruk(Uuid::nil(), Decimal::ZERO, dec!(1), Decimal::ZERO, 1);
        assert_eq!(f.forbruk_prosent, dec!(100));
        assert_eq!(f.farge, RammeFarge::Rod);
        let empty = compute_forbruk(Uuid::nil(), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, 0);
        assert_eq!(empty.farge, RammeFarge::Gronn);
    }

    #[test]
    fn test_validation_properties() {
        let cases = [
            (dec!(1000), dec!(400), dec!(600)),
            (dec!(1000), dec!(400), dec!(601)),
            (dec!(1000), dec!(0), dec!(50)),
            (dec!(0), dec!(0), dec!(1)),
            (dec!(1000), dec!(1200), dec!(0)),
        ];
        for (r, c, a) in cases {
            let v = validate_ramme(r, c, a);
            assert_eq!(v.gyldig, r - c - a >= Decimal::ZERO);
            assert_eq!(v.overskredet_belop, (a - (r - c)).max(Decimal::ZERO));
        }
    }

    #[test]
    fn test_near_limit_warning() {
        let v = validate_ramme(dec!(1000), dec!(800), dec!(150));
        assert!(v.gyldig);
        assert!(v.naer_grense);
        assert_eq!(v.tilgjengelig_etter, dec!(50));

        let v = validate_ramme(dec!(1000), dec!(800), dec!(100));
        assert!(!v.naer_grense);

        let v = validate_ramme(dec!(1000), dec!(800), dec!(250));
        assert!(!v.gyldig);
        assert_eq!(v.overskredet_belop, dec!(50));
        assert_eq!(v.melding, "Rammen overskrides med 50 kr");
    }

    #[tokio::test]
    async fn test_forbruk_counts_produced_projects_and_splits_current() {
        let selskap = selskap_model(Some(dec!(10000000)));
        let produsert = prosjekt_model(selskap.id, ProsjektStatus::Produsert);
        let utvides = prosjekt_model(selskap.id, ProsjektStatus::Utvides);
        let behandles = prosjekt_model(selskap.id, ProsjektStatus::Behandles);
        let gjeldende = prosjekt_model(selskap.id, ProsjektStatus::Produsert);
        let t1 = tilbud_model(produsert.id);
        let t2 = tilbud_model(utvides.id);
        let t3 = tilbud_model(gjeldende.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap.clone()]])
            .append_query_results([vec![
                produsert.clone(),
                utvides.clone(),
                behandles.clone(),
                gjeldende.clone(),
            ]])
            .append_query_results([vec![t1.clone(), t2.clone()]])
            .append_query_results([vec![
                beregning_model(t1.id, dec!(4000000)),
                beregning_model(t2.id, dec!(2000000)),
            ]])
            .append_query_results([vec![t3.clone()]])
            .append_query_results([vec![beregning_model(t3.id, dec!(1500000))]])
            .into_connection();
        let db = Arc::new(db);

        let forbruk = RammeService::new(db.clone())
            .get_forbruk(selskap.id, Some(gjeldende.id))
            .await
            .unwrap();
        assert_eq!(forbruk.forbrukt_av_andre, dec!(6000000));
        assert_eq!(forbruk.gjeldende_prosjekt, dec!(1500000));
        assert_eq!(forbruk.antall_produserte_prosjekter, 2);
        assert_eq!(forbruk.forbruk_prosent, dec!(75));
        assert_eq!(forbruk.farge, RammeFarge::Gul);

        let log = Arc::try_unwrap(db)
            .ok()
            .expect("connection still shared")
            .into_transaction_log();
        assert_eq!(log.len(), 6);
        // other produced tilbud: only Produsert/Utvides prosjekter, current one left out
        let andre = format!("{:?}", log[2]);
        assert!(andre.contains(&produsert.id.to_string()));
        assert!(andre.contains(&utvides.id.to_string()));
        assert!(!andre.contains(&behandles.id.to_string()));
        assert!(!andre.contains(&gjeldende.id.to_string()));
        let current = format!("{:?}", log[4]);
        assert!(current.contains(&gjeldende.id.to_string()));
        assert!(current.contains("NOT IN"));
    }

    #[tokio::test]
    async fn test_forbruk_rejects_project_of_other_selskap() {
        let selskap = selskap_model(Some(dec!(1000)));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap.clone()]])
            .append_query_results([vec![prosjekt_model(selskap.id, ProsjektStatus::Produsert)]])
            .into_connection();

        let err = RammeService::new(db)
            .get_forbruk(selskap.id, Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().starts_with("ekskluderProsjektId"));
    }

    #[tokio::test]
    async fn test_forbruk_without_produced_projects_skips_tilbud_lookup() {
        let selskap = selskap_model(None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![selskap.clone()]])
            .append_query_results([vec![prosjekt_model(selskap.id, ProsjektStatus::Behandles)]])
            .into_connection();

        let forbruk = RammeService::new(db).get_forbruk(selskap.id, None).await.unwrap();
        assert_eq!(forbruk.forbrukt_av_andre, Decimal::ZERO);
        assert_eq!(forbruk.antall_produserte_prosjekter, 0);
        assert_eq!(forbruk.farge, RammeFarge::Gronn);
    }
}
