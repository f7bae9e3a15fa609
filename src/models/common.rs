//! Shared IPC types: the response envelope and polymorphic owner references

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Uniform response for every IPC channel. Never partial success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IpcResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Owner of a document or hendelse. Serialized as `{"type": "selskap", "id": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntityContext {
    Sak(Uuid),
    Selskap(Uuid),
    Prosjekt(Uuid),
}

impl EntityContext {
    /// Split into the mutually exclusive (sak_id, selskap_id, prosjekt_id) columns
    pub fn foreign_keys(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            EntityContext::Sak(id) => (Some(id), None, None),
            EntityContext::Selskap(id) => (None, Some(id), None),
            EntityContext::Prosjekt(id) => (None, None, Some(id)),
        }
    }

    pub fn from_foreign_keys(
        sak_id: Option<Uuid>,
        selskap_id: Option<Uuid>,
        prosjekt_id: Option<Uuid>,
    ) -> Option<Self> {
        match (sak_id, selskap_id, prosjekt_id) {
            (Some(id), None, None) => Some(EntityContext::Sak(id)),
            (None, Some(id), None) => Some(EntityContext::Selskap(id)),
            (None, None, Some(id)) => Some(EntityContext::Prosjekt(id)),
            _ => None,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            EntityContext::Sak(id) | EntityContext::Selskap(id) | EntityContext::Prosjekt(id) => id,
        }
    }
}

/// Params for channels that only need an id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdRequest {
    pub id: Uuid,
    pub utfort_av: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_context_json_shape() {
        let id = Uuid::nil();
        let json = serde_json::to_value(EntityContext::Prosjekt(id)).unwrap();
        assert_eq!(json["type"], "prosjekt");
        assert_eq!(json["id"], id.to_string());

        let parsed: EntityContext =
            serde_json::from_str(&format!(r#"{{"type":"sak","id":"{}"}}"#, id)).unwrap();
        assert_eq!(parsed, EntityContext::Sak(id));
    }

    #[test]
    fn test_foreign_keys_are_exclusive() {
        let id = Uuid::new_v4();
        let (sak, selskap, prosjekt) = EntityContext::Selskap(id).foreign_keys();
        assert_eq!((sak, selskap, prosjekt), (None, Some(id), None));
        assert_eq!(
            EntityContext::from_foreign_keys(sak, selskap, prosjekt),
            Some(EntityContext::Selskap(id))
        );
        assert_eq!(EntityContext::from_foreign_keys(Some(id), Some(id), None), None);
        assert_eq!(EntityContext::from_foreign_keys(None, None, None), None);
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(IpcResponse::err("feil")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "feil");
        assert!(json.get("data").is_none());
    }
}
