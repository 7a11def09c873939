//! Port (link end) model, DTOs and read-only join views.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use wr_core::calibration::{PortBoardDelta, SfpCalibration};
use wr_core::custom_fields::Metadata;
use wr_core::network_clone::PortRefs;
use wr_core::topology::LinkEnd;
use wr_core::types::{DbId, Timestamp};
use wr_core::wr_config::PortCalibration;

/// A port row from the `ports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Port {
    pub id: DbId,
    pub project_id: DbId,
    pub switch_id: DbId,
    pub port_num: i32,
    pub sfp_id: Option<DbId>,
    pub remote_sfp_id: Option<DbId>,
    pub connected_to_id: Option<DbId>,
    pub connected_port_num: Option<i32>,
    pub port_delta_tx: f64,
    pub port_delta_rx: f64,
    /// `None` means untagged.
    pub vlan: Option<i32>,
    pub remarks: Option<String>,
    pub metadata: Json<Metadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Port {
    pub fn refs(&self) -> PortRefs {
        PortRefs {
            switch_id: self.switch_id,
            sfp_id: self.sfp_id,
            remote_sfp_id: self.remote_sfp_id,
            connected_to_id: self.connected_to_id,
        }
    }

    pub fn board_delta(&self) -> PortBoardDelta {
        PortBoardDelta {
            tx: self.port_delta_tx,
            rx: self.port_delta_rx,
        }
    }
}

/// DTO for creating or fully replacing a port.
///
/// Absent optional references are stored as NULL, so an update can unplug
/// an SFP or disconnect a link.
#[derive(Debug, Clone, Deserialize)]
pub struct PortInput {
    pub switch_id: DbId,
    pub port_num: i32,
    pub sfp_id: Option<DbId>,
    pub remote_sfp_id: Option<DbId>,
    pub connected_to_id: Option<DbId>,
    pub connected_port_num: Option<i32>,
    #[serde(default)]
    pub port_delta_tx: f64,
    #[serde(default)]
    pub port_delta_rx: f64,
    pub vlan: Option<i32>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A port joined with the names of everything it references, for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PortDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub port: Port,
    pub switch_name: String,
    pub sfp_serial: Option<String>,
    pub remote_sfp_serial: Option<String>,
    pub remote_switch_name: Option<String>,
}

/// A port joined with its local SFP's calibration, for config export.
#[derive(Debug, Clone, FromRow)]
pub struct PortCalibrationRow {
    pub port_num: i32,
    pub remarks: Option<String>,
    pub metadata: Json<Metadata>,
    pub port_delta_tx: f64,
    pub port_delta_rx: f64,
    pub sfp_id: Option<DbId>,
    pub sfp_alpha: Option<f64>,
    pub sfp_delta_tx: Option<f64>,
    pub sfp_delta_rx: Option<f64>,
}

impl PortCalibrationRow {
    pub fn into_calibration(self) -> PortCalibration {
        let sfp = self.sfp_id.map(|_| SfpCalibration {
            alpha: self.sfp_alpha.unwrap_or_default(),
            delta_tx: self.sfp_delta_tx.unwrap_or_default(),
            delta_rx: self.sfp_delta_rx.unwrap_or_default(),
        });
        PortCalibration {
            port_num: self.port_num,
            remarks: self.remarks,
            metadata: self.metadata.0,
            board: PortBoardDelta {
                tx: self.port_delta_tx,
                rx: self.port_delta_rx,
            },
            sfp,
        }
    }
}

/// A port that points at a remote switch, for topology building.
#[derive(Debug, Clone, FromRow)]
pub struct LinkRow {
    pub port_id: DbId,
    pub switch_id: DbId,
    pub port_num: i32,
    pub connected_to_id: DbId,
    pub connected_port_num: Option<i32>,
    pub vlan: Option<i32>,
}

impl From<LinkRow> for LinkEnd {
    fn from(row: LinkRow) -> Self {
        LinkEnd {
            port_id: row.port_id,
            switch_id: row.switch_id,
            port_num: row.port_num,
            connected_to_id: row.connected_to_id,
            connected_port_num: row.connected_port_num,
            vlan: row.vlan,
        }
    }
}
