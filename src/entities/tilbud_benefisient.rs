//! SeaORM Entity for tilbud_benefisient (beneficiaries with a share of an offer)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BenefisientType {
    /// Legal person, identified by organisasjonsnummer
    #[sea_orm(string_value = "Juridisk")]
    Juridisk,
    /// Natural person, identified by personident
    #[sea_orm(string_value = "Fysisk")]
    Fysisk,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tilbud_benefisient")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tilbud_id: Uuid,
    pub enhet_id: Option<Uuid>,
    pub benefisient_type: BenefisientType,
    pub navn: String,
    pub organisasjonsnummer: Option<String>,
    pub personident: Option<String>,
    /// Share in percent, 0 < andel <= 100
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub andel: Decimal,
    pub aktiv: bool,
    pub aktiv_fra: DateTimeWithTimeZone,
    pub aktiv_til: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tilbud::Entity",
        from = "Column::TilbudId",
        to = "super::tilbud::Column::Id",
        on_delete = "Cascade"
    )]
    Tilbud,
    #[sea_orm(
        belongs_to = "super::tilbud_enhet::Entity",
        from = "Column::EnhetId",
        to = "super::tilbud_enhet::Column::Id",
        on_delete = "SetNull"
    )]
    Enhet,
}

impl Related<super::tilbud::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tilbud.def()
    }
}

impl Related<super::tilbud_enhet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enhet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
