//! Timing calibration arithmetic.
//!
//! Delays are kept as `f64` picoseconds end to end. Rounding happens only
//! when the config exporter prints them (see [`crate::wr_config`]).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Group refractive index of standard single-mode fiber.
pub const FIBER_REFRACTIVE_INDEX: f64 = 1.4682;

/// Speed of light in vacuum, metres per second.
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

/// Per-unit calibration of an SFP transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SfpCalibration {
    pub alpha: f64,
    pub delta_tx: f64,
    pub delta_rx: f64,
}

/// Port-board (PCB) delays of a switch port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortBoardDelta {
    pub tx: f64,
    pub rx: f64,
}

/// Effective transmit/receive delay of a port with its plugged SFP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDelay {
    pub tx: f64,
    pub rx: f64,
}

/// Sum the SFP and port-board delays. A port without an SFP contributes
/// only its board delays.
pub fn resolve_port_delay(port: &PortBoardDelta, sfp: Option<&SfpCalibration>) -> ResolvedDelay {
    let (sfp_tx, sfp_rx) = sfp.map_or((0.0, 0.0), |s| (s.delta_tx, s.delta_rx));
    ResolvedDelay {
        tx: sfp_tx + port.tx,
        rx: sfp_rx + port.rx,
    }
}

/// One-way propagation delay in nanoseconds over `length_km` of fiber.
pub fn fiber_delay_ns(length_km: f64) -> Result<f64, CoreError> {
    if !length_km.is_finite() || length_km < 0.0 {
        return Err(CoreError::Validation(format!(
            "Fiber length must be a non-negative number of kilometres, got {length_km}"
        )));
    }
    Ok(length_km * 1000.0 * FIBER_REFRACTIVE_INDEX / SPEED_OF_LIGHT_M_PER_S * 1e9)
}
