//! SFP transceiver model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use wr_core::calibration::SfpCalibration;
use wr_core::custom_fields::Metadata;
use wr_core::types::{DbId, Timestamp};

/// An SFP row from the `sfps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sfp {
    pub id: DbId,
    pub project_id: DbId,
    pub serial: String,
    pub wavelength: Option<String>,
    pub channel: Option<String>,
    pub alpha: f64,
    /// Picoseconds.
    pub delta_tx: f64,
    /// Picoseconds.
    pub delta_rx: f64,
    pub remarks: Option<String>,
    pub metadata: Json<Metadata>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Sfp {
    pub fn calibration(&self) -> SfpCalibration {
        SfpCalibration {
            alpha: self.alpha,
            delta_tx: self.delta_tx,
            delta_rx: self.delta_rx,
        }
    }
}

/// DTO for creating or replacing an SFP. Calibration values default to 0.
#[derive(Debug, Clone, Deserialize)]
pub struct SfpInput {
    pub serial: String,
    pub wavelength: Option<String>,
    pub channel: Option<String>,
    #[serde(default)]
    pub alpha: f64,
    #[serde(default)]
    pub delta_tx: f64,
    #[serde(default)]
    pub delta_rx: f64,
    pub remarks: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}
