//! Storage of the premium calculation attached to a tilbud (one per tilbud)

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::*, tilbud_beregning};
use crate::error::ServiceResult;
use crate::models::beregning::{BeregningDto, SaveBeregningRequest};
use crate::services::beregning_calculator::{self, BeregningInput};
use crate::services::hendelse::typer;
use crate::services::tilbud;

#[derive(Clone)]
pub struct BeregningService {
    db: Arc<DatabaseConnection>,
}

impl BeregningService {
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    pub async fn get(&self, tilbud_id: Uuid) -> ServiceResult<Option<BeregningDto>> {
        let row = TilbudBeregning::find()
            .filter(tilbud_beregning::Column::TilbudId.eq(tilbud_id))
            .one(self.db.as_ref())
            .await?;
        Ok(row.map(BeregningDto::from))
    }

    /// Recalculate the premiums from the inputs and upsert
    pub async fn save(&self, req: SaveBeregningRequest) -> ServiceResult<BeregningDto> {
        let input = BeregningInput {
            kontraktssum: req.kontraktssum,
            utforelsestid_maaneder: req.utforelsestid_maaneder,
            garantitid_aar: req.garantitid_aar,
            rente_utforelse: req.rente_utforelse,
            rente_garanti: req.rente_garanti,
            etableringsgebyr: req.etableringsgebyr.unwrap_or_default(),
        };
        let resultat = beregning_calculator::calculate(&input)?;

        let tilbud = tilbud::find_required(self.db.as_ref(), req.tilbud_id).await?;
        let existing = TilbudBeregning::find()
            .filter(tilbud_beregning::Column::TilbudId.eq(tilbud.id))
            .one(self.db.as_ref())
            .await?;

        let now = Utc::now().fixed_offset();
        let is_new = existing.is_none();
        let txn = self.db.begin().await?;
        let mut active: tilbud_beregning::ActiveModel = match existing {
            Some(model) => model.into(),
            None => tilbud_beregning::ActiveModel {
                id: Set(Uuid::new_v4()),
                tilbud_id: Set(tilbud.id),
                created_at: Set(now),
                ..Default::default()
            },
        };
        active.kontraktssum = Set(input.kontraktssum);
        active.utforelsestid_maaneder = Set(input.utforelsestid_maaneder);
        active.garantitid_aar = Set(input.garantitid_aar);
        active.rente_utforelse = Set(input.rente_utforelse);
        active.rente_garanti = Set(input.rente_garanti);
        active.etableringsgebyr = Set(input.etableringsgebyr);
        active.premie_utforelse = Set(resultat.premie_utforelse);
        active.premie_garanti = Set(resultat.premie_garanti);
        active.total_premie = Set(resultat.total_premie);
        active.updated_at = Set(now);

        let saved = if is_new {
            active.insert(&txn).await?
        } else {
            active.update(&txn).await?
        };

        let tilbud = tilbud::bump_version(&txn, tilbud).await?;
        tilbud::log_tilbud_hendelse(
            &txn,
            &tilbud,
            typer::BEREGNING_LAGRET,
            format!(
                "beregning lagret, kontraktssum {} kr, total premie {} kr",
                saved.kontraktssum, saved.total_premie
            ),
            req.utfort_av,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(tilbud_id = %tilbud.id, total_premie = %saved.total_premie, "Beregning saved");
        Ok(saved.into())
    }
}
