use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::bruker::{self, Rolle};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrukerDto {
    pub id: Uuid,
    pub epost: String,
    pub navn: String,
    pub rolle: Rolle,
    pub aktiv: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<bruker::Model> for BrukerDto {
    fn from(m: bruker::Model) -> Self {
        Self {
            id: m.id,
            epost: m.epost,
            navn: m.navn,
            rolle: m.rolle,
            aktiv: m.aktiv,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrukerRequest {
    pub epost: String,
    pub navn: String,
    pub rolle: Rolle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolleRequest {
    pub id: Uuid,
    pub rolle: Rolle,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrukerListQuery {
    #[serde(default)]
    pub inkluder_inaktive: bool,
}
