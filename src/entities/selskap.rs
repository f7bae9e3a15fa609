//! SeaORM Entity for selskap (guarantee customer companies)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "selskap")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Norwegian organization number, 9 digits. Never changes after creation.
    #[sea_orm(unique)]
    pub organisasjonsnummer: String,
    pub navn: String,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    /// Credit/exposure ceiling in NOK
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub ramme: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prosjekt::Entity")]
    Prosjekt,
}

impl Related<super::prosjekt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prosjekt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
