//! Switch entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use wr_core::custom_fields::Metadata;
use wr_core::topology::SwitchNode;
use wr_core::types::{DbId, Timestamp};
use wr_core::wr_config::NodeIdentity;

/// A switch row from the `switches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Switch {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// One of the `SwitchRole` labels.
    pub role: String,
    pub ip_address: Option<String>,
    pub mac: Option<String>,
    pub clock_source: Option<String>,
    pub remarks: Option<String>,
    pub metadata: Json<Metadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Switch {
    pub fn node_identity(&self) -> NodeIdentity {
        NodeIdentity {
            name: self.name.clone(),
            mac: self.mac.clone(),
        }
    }

    pub fn topology_node(&self) -> SwitchNode {
        SwitchNode {
            id: self.id,
            name: self.name.clone(),
            role: self.role.clone(),
            ip_address: self.ip_address.clone(),
            mac: self.mac.clone(),
        }
    }
}

/// DTO for creating or replacing a switch.
///
/// Used both for the upsert keyed on `(project, name)` and for full updates
/// by id.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchInput {
    pub name: String,
    pub role: String,
    pub ip_address: Option<String>,
    pub mac: Option<String>,
    pub clock_source: Option<String>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}
