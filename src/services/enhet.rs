//! Enheter (apartments, lots, units) under a tilbud

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::prosjekt::Prosjekttype;
use crate::entities::{prelude::*, tilbud_enhet};
use crate::error::{ServiceError, ServiceResult};
use crate::models::enhet::{CreateEnhetRequest, EnhetDto, GenererEnheterRequest, UpdateEnhetRequest};
use crate::services::hendelse::typer;
use crate::services::{benefisient, prosjekt, tilbud, validation};

pub const MAX_ENHETER: u32 = 1000;

/// (label prefix, enhetstype) per project type
pub fn template(prosjekttype: Option<Prosjekttype>) -> (&'static str, &'static str) {
    match prosjekttype {
        Some(Prosjekttype::Borettslag) => ("Leilighet", "Leilighet"),
        Some(Prosjekttype::Eierseksjonssameie) => ("Seksjon", "Seksjon"),
        Some(Prosjekttype::Rekkehus) => ("Rekkehus", "Bolig"),
        Some(Prosjekttype::Enebolig) => ("Enebolig", "Bolig"),
        Some(Prosjekttype::Tomtefelt) => ("Tomt", "Tomt"),
        Some(Prosjekttype::Naeringsbygg) => ("Næringsseksjon", "Næring"),
        None => ("Enhet", "Enhet"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanlagtEnhet {
    pub betegnelse: String,
    pub enhetstype: String,
    pub andel_av_helhet: Decimal,
}

/// Equal shares in whole hundredths. The leftover hundredths go one each to
/// the last units, so shares differ by at most 0.01 and sum to exactly 100.
pub fn plan_enheter(
    prosjekttype: Option<Prosjekttype>,
    antall: u32,
    prefiks: Option<&str>,
) -> ServiceResult<Vec<PlanlagtEnhet>> {
    if antall == 0 || antall > MAX_ENHETER {
        return Err(ServiceError::validation(
            "antall",
            format!("må være mellom 1 og {}", MAX_ENHETER),
        ));
    }
    let (default_prefix, enhetstype) = template(prosjekttype);
    let prefix = validation::optional_text(prefiks).unwrap_or_else(|| default_prefix.to_string());

    const HUNDREDTHS: u32 = 10_000;
    let base = HUNDREDTHS / antall;
    let extra = HUNDREDTHS % antall;

    Ok((1..=antall)
        .map(|i| {
            let hundredths = if i > antall - extra { base + 1 } else { base };
            PlanlagtEnhet {
                betegnelse: format!("{} {}", prefix, i),
                enhetstype: enhetstype.to_string(),
                andel_av_helhet: Decimal::new(hundredths as i64, 2),
            }
        })
        .collect())
}

fn validate_andel_av_helhet(andel: Decimal) -> ServiceResult<Decimal> {
    if andel < Decimal::ZERO || andel > dec!(100) {
        return Err(ServiceError::validation("andelAvHelhet", "må være mellom 0 og 100"));
    }
    Ok(andel)
}

async fn find_required(db: &DatabaseConnection, id: Uuid) -> ServiceResult<tilbud_enhet::Model> {
    TilbudEnhet::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Enhet", id))
}

#[derive(Clone)]
pub struct EnhetService {
    db: Arc<DatabaseConnection>,
}

impl EnhetService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn list(&self, tilbud_id: Uuid) -> ServiceResult<Vec<EnhetDto>> {
        let rows = TilbudEnhet::find()
            .filter(tilbud_enhet::Column::TilbudId.eq(tilbud_id))
            .order_by_asc(tilbud_enhet::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(EnhetDto::from).collect())
    }

    pub async fn create(&self, req: CreateEnhetRequest) -> ServiceResult<EnhetDto> {
        let betegnelse = validation::require_text("betegnelse", &req.betegnelse)?;
        let andel = validate_andel_av_helhet(req.andel_av_helhet)?;
        let tilbud = tilbud::find_required(self.db.as_ref(), req.tilbud_id).await?;
        let enhetstype = match validation::optional_text(req.enhetstype.as_deref()) {
            Some(t) => t,
            None => {
                let prosjekt = prosjekt::find_required(self.db.as_ref(), tilbud.prosjekt_id).await?;
                template(prosjekt.prosjekttype).1.to_string()
            }
        };

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;
        let model = tilbud_enhet::ActiveModel {
            id: Set(Uuid::new_v4()),
            tilbud_id: Set(tilbud.id),
            betegnelse: Set(betegnelse),
            enhetstype: Set(enhetstype),
            andel_av_helhet: Set(andel),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::ENHET_ENDRET,
            format!("enhet «{}» lagt til", model.betegnelse),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        Ok(model.into())
    }

    pub async fn update(&self, req: UpdateEnhetRequest) -> ServiceResult<EnhetDto> {
        let existing = find_required(self.db.as_ref(), req.id).await?;
        let betegnelse = match req.betegnelse.as_deref() {
            Some(b) => validation::require_text("betegnelse", b)?,
            None => existing.betegnelse.clone(),
        };
        let enhetstype = validation::optional_text(req.enhetstype.as_deref())
            .unwrap_or_else(|| existing.enhetstype.clone());
        let andel = match req.andel_av_helhet {
            Some(a) => validate_andel_av_helhet(a)?,
            None => existing.andel_av_helhet,
        };
        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;

        let txn = self.db.begin().await?;
        let mut active: tilbud_enhet::ActiveModel = existing.into();
        active.betegnelse = Set(betegnelse);
        active.enhetstype = Set(enhetstype);
        active.andel_av_helhet = Set(andel);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&txn).await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::ENHET_ENDRET,
            format!("enhet «{}» endret", updated.betegnelse),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    /// Refused while active benefisienter point at the enhet; removing it
    /// would move their shares into the tilbud-level scope.
    pub async fn delete(&self, id: Uuid, utfort_av: Option<Uuid>) -> ServiceResult<()> {
        let existing = find_required(self.db.as_ref(), id).await?;
        if benefisient::count_active_on_enheter(self.db.as_ref(), &[id]).await? > 0 {
            return Err(ServiceError::BusinessRule(format!(
                "Enhet «{}» har aktive benefisienter og kan ikke slettes",
                existing.betegnelse
            )));
        }
        let tilbud = tilbud::find_required(self.db.as_ref(), existing.tilbud_id).await?;

        let txn = self.db.begin().await?;
        TilbudEnhet::delete_by_id(id).exec(&txn).await?;
        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::ENHET_ENDRET,
            format!("enhet «{}» slettet", existing.betegnelse),
            utfort_av,
        )
        .await?;
        txn.commit().await?;
        Ok(())
    }

    /// Bulk-create enheter from the project-type template
    pub async fn generer(&self, req: GenererEnheterRequest) -> ServiceResult<Vec<EnhetDto>> {
        let tilbud = tilbud::find_required(self.db.as_ref(), req.tilbud_id).await?;
        let prosjekt = prosjekt::find_required(self.db.as_ref(), tilbud.prosjekt_id).await?;
        let plan = plan_enheter(prosjekt.prosjekttype, req.antall, req.prefiks.as_deref())?;

        let existing = benefisient::enhet_ids_for_tilbud(self.db.as_ref(), tilbud.id).await?;
        if !existing.is_empty() {
            if !req.erstatt_eksisterende {
                return Err(ServiceError::BusinessRule(format!(
                    "Tilbudet har allerede {} enheter",
                    existing.len()
                )));
            }
            if benefisient::count_active_on_enheter(self.db.as_ref(), &existing).await? > 0 {
                return Err(ServiceError::BusinessRule(
                    "Eksisterende enheter har aktive benefisienter og kan ikke erstattes".to_string(),
                ));
            }
        }

        let now = Utc::now().fixed_offset();
        let models: Vec<tilbud_enhet::Model> = plan
            .into_iter()
            .map(|p| tilbud_enhet::Model {
                id: Uuid::new_v4(),
                tilbud_id: tilbud.id,
                betegnelse: p.betegnelse,
                enhetstype: p.enhetstype,
                andel_av_helhet: p.andel_av_helhet,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let txn = self.db.begin().await?;
        if !existing.is_empty() {
            TilbudEnhet::delete_many()
                .filter(tilbud_enhet::Column::TilbudId.eq(tilbud.id))
                .exec(&txn)
                .await?;
        }
        TilbudEnhet::insert_many(models.iter().cloned().map(tilbud_enhet::ActiveModel::from))
            .exec_without_returning(&txn)
            .await?;

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::ENHET_ENDRET,
            format!("{} enheter generert", models.len()),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(tilbud_id = %tilbud.id, antall = models.len(), "Enheter generated");
        Ok(models.into_iter().map(EnhetDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_shares_sum_to_100() {
        for antall in [1u32, 3, 7, 12, 99, 240, 600, 999, MAX_ENHETER] {
            let plan = plan_enheter(Some(Prosjekttype::Borettslag), antall, None).unwrap();
            let total: Decimal = plan.iter().map(|e| e.andel_av_helhet).sum();
            assert_eq!(total, dec!(100), "antall {}", antall);
            assert!(
                plan.iter().all(|e| e.andel_av_helhet >= Decimal::ZERO && e.andel_av_helhet <= dec!(100)),
                "antall {}",
                antall
            );
            let min = plan.iter().map(|e| e.andel_av_helhet).min().unwrap();
            let max = plan.iter().map(|e| e.andel_av_helhet).max().unwrap();
            assert!(max - min <= dec!(0.01), "antall {}", antall);
        }
    }

    #[test]
    fn test_plan_labels_and_remainder() {
        let plan = plan_enheter(Some(Prosjekttype::Tomtefelt), 3, None).unwrap();
        assert_eq!(plan[0].betegnelse, "Tomt 1");
        assert_eq!(plan[2].betegnelse, "Tomt 3");
        assert_eq!(plan[0].enhetstype, "Tomt");
        assert_eq!(plan[0].andel_av_helhet, dec!(33.33));
        assert_eq!(plan[2].andel_av_helhet, dec!(33.34));
    }

    #[test]
    fn test_plan_large_count_never_negative() {
        let plan = plan_enheter(None, 240, None).unwrap();
        assert_eq!(plan[0].andel_av_helhet, dec!(0.41));
        assert_eq!(plan[239].andel_av_helhet, dec!(0.42));
        assert_eq!(plan.iter().filter(|e| e.andel_av_helhet == dec!(0.42)).count(), 160);
    }

    #[test]
    fn test_plan_prefix_override() {
        let plan = plan_enheter(None, 2, Some("Bolig")).unwrap();
        assert_eq!(plan[1].betegnelse, "Bolig 2");
        assert_eq!(plan[1].enhetstype, "Enhet");
    }

    #[test]
    fn test_plan_limits() {
        assert!(plan_enheter(None, 0, None).is_err());
        assert!(plan_enheter(None, MAX_ENHETER + 1, None).is_err());
    }
}
