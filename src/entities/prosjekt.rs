//! SeaORM Entity for prosjekt (guarantee projects under a selskap)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project status. Derived from the statuses of the project's tilbud,
/// except for the adviser-assignment transition Ny -> Tildelt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum ProsjektStatus {
    #[sea_orm(string_value = "Ny")]
    Ny,
    #[sea_orm(string_value = "Tildelt")]
    Tildelt,
    #[sea_orm(string_value = "Behandles")]
    Behandles,
    #[sea_orm(string_value = "AvventerGodkjenningUW")]
    AvventerGodkjenningUW,
    #[sea_orm(string_value = "KlarTilProduksjon")]
    KlarTilProduksjon,
    #[sea_orm(string_value = "Produsert")]
    Produsert,
    #[sea_orm(string_value = "Avslaatt")]
    Avslaatt,
    #[sea_orm(string_value = "Utvides")]
    Utvides,
}

impl ProsjektStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProsjektStatus::Ny => "Ny",
            ProsjektStatus::Tildelt => "Tildelt",
            ProsjektStatus::Behandles => "Behandles",
            ProsjektStatus::AvventerGodkjenningUW => "Avventer godkjenning UW",
            ProsjektStatus::KlarTilProduksjon => "Klar til produksjon",
            ProsjektStatus::Produsert => "Produsert",
            ProsjektStatus::Avslaatt => "Avslått",
            ProsjektStatus::Utvides => "Utvides",
        }
    }
}

/// Project type; decides the template used when generating enheter in bulk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(40))")]
pub enum Prosjekttype {
    #[sea_orm(string_value = "Borettslag")]
    Borettslag,
    #[sea_orm(string_value = "Eierseksjonssameie")]
    Eierseksjonssameie,
    #[sea_orm(string_value = "Rekkehus")]
    Rekkehus,
    #[sea_orm(string_value = "Enebolig")]
    Enebolig,
    #[sea_orm(string_value = "Tomtefelt")]
    Tomtefelt,
    #[sea_orm(string_value = "Naeringsbygg")]
    Naeringsbygg,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prosjekt")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub selskap_id: Uuid,
    pub navn: String,
    pub prosjekttype: Option<Prosjekttype>,
    pub status: ProsjektStatus,
    pub ansvarlig_radgiver_id: Option<Uuid>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub kommentar: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::selskap::Entity",
        from = "Column::SelskapId",
        to = "super::selskap::Column::Id",
        on_delete = "Cascade"
    )]
    Selskap,
    #[sea_orm(has_many = "super::tilbud::Entity")]
    Tilbud,
}

impl Related<super::selskap::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Selskap.def()
    }
}

impl Related<super::tilbud::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tilbud.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
