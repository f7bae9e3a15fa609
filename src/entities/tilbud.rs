//! SeaORM Entity for tilbud (guarantee offers)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum TilbudStatus {
    #[sea_orm(string_value = "Utkast")]
    Utkast,
    #[sea_orm(string_value = "TilBehandling")]
    TilBehandling,
    #[sea_orm(string_value = "UnderUWBehandling")]
    UnderUWBehandling,
    #[sea_orm(string_value = "Godkjent")]
    Godkjent,
    #[sea_orm(string_value = "Produsert")]
    Produsert,
    #[sea_orm(string_value = "Avslatt")]
    Avslatt,
    #[sea_orm(string_value = "Utlopt")]
    Utlopt,
}

impl TilbudStatus {
    /// Precedence used when deriving the project status (higher wins)
    pub fn precedence(&self) -> u8 {
        match self {
            TilbudStatus::Produsert => 6,
            TilbudStatus::Godkjent => 5,
            TilbudStatus::UnderUWBehandling => 4,
            TilbudStatus::TilBehandling => 3,
            TilbudStatus::Utkast => 2,
            TilbudStatus::Avslatt | TilbudStatus::Utlopt => 1,
        }
    }

    /// Offer still in play (not produced, rejected or expired)
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TilbudStatus::Utkast
                | TilbudStatus::TilBehandling
                | TilbudStatus::UnderUWBehandling
                | TilbudStatus::Godkjent
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            TilbudStatus::Utkast => "Utkast",
            TilbudStatus::TilBehandling => "Til behandling",
            TilbudStatus::UnderUWBehandling => "Under UW-behandling",
            TilbudStatus::Godkjent => "Godkjent",
            TilbudStatus::Produsert => "Produsert",
            TilbudStatus::Avslatt => "Avslått",
            TilbudStatus::Utlopt => "Utløpt",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tilbud")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub prosjekt_id: Uuid,
    pub tilbudsnummer: String,
    pub produkttype: String,
    pub status: TilbudStatus,
    /// Change counter, bumped on every mutation of the offer or its children
    pub versjonsnummer: i32,
    pub kommentar: Option<String>,
    pub opprettet_av: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::prosjekt::Entity",
        from = "Column::ProsjektId",
        to = "super::prosjekt::Column::Id",
        on_delete = "Cascade"
    )]
    Prosjekt,
    #[sea_orm(has_one = "super::tilbud_beregning::Entity")]
    Beregning,
}

impl Related<super::prosjekt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prosjekt.def()
    }
}

impl Related<super::tilbud_beregning::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beregning.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
