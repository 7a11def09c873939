//! White Rabbit switch `.config` generation.
//!
//! Turns a switch and its calibrated ports into the `KEY=value` text the
//! switch firmware reads. The output is a pure function of the inputs.

use crate::calibration::{resolve_port_delay, PortBoardDelta, SfpCalibration};
use crate::custom_fields::Metadata;

/// Placeholder printed in the port comment line when a port has no remarks.
pub const NO_REMARKS: &str = "No Remarks";

/// Decimal places kept when printing delays.
const DELAY_DECIMALS: i32 = 3;

/// The switch the config is generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeIdentity {
    pub name: String,
    pub mac: Option<String>,
}

/// A port with everything needed to compute its calibration lines.
#[derive(Debug, Clone, PartialEq)]
pub struct PortCalibration {
    pub port_num: i32,
    pub remarks: Option<String>,
    pub metadata: Metadata,
    pub board: PortBoardDelta,
    /// The locally plugged SFP, if any.
    pub sfp: Option<SfpCalibration>,
}

/// Render the `.config` text for one switch.
///
/// Ports are emitted in ascending port-number order regardless of input
/// order. The result always ends with a newline.
pub fn export_config(node: &NodeIdentity, ports: &[PortCalibration]) -> String {
    let mut sorted: Vec<&PortCalibration> = ports.iter().collect();
    sorted.sort_by_key(|p| p.port_num);

    let mut lines = vec![
        format!("# White Rabbit Config: {}", single_line(&node.name)),
        format!(
            "CONFIG_WR_NODE_MAC=\"{}\"",
            node.mac.as_deref().unwrap_or_default()
        ),
    ];

    for port in sorted {
        let n = port.port_num;
        let delay = resolve_port_delay(&port.board, port.sfp.as_ref());
        let alpha = port.sfp.map_or(0.0, |s| s.alpha);

        lines.push(String::new());
        lines.push(port_comment(port));
        lines.push(format!("CONFIG_PORT{n}_SFP_ALPHA={}", format_alpha(alpha)));
        lines.push(format!("CONFIG_PORT{n}_DELTA_TX={}", format_delay(delay.tx)));
        lines.push(format!("CONFIG_PORT{n}_DELTA_RX={}", format_delay(delay.rx)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn port_comment(port: &PortCalibration) -> String {
    let remarks = port
        .remarks
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(NO_REMARKS);
    let remarks = single_line(remarks);

    let mut line = format!("# Port {} [{remarks}]", port.port_num);
    if !port.metadata.is_empty() {
        let pairs: Vec<String> = port
            .metadata
            .iter()
            .map(|(k, v)| format!("{k}={}", single_line(v)))
            .collect();
        line.push_str(&format!(" {{{}}}", pairs.join(", ")));
    }
    line
}

/// Free text only ever lands inside `#` comment lines; a line break would
/// start a new `KEY=value` line.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Round to [`DELAY_DECIMALS`] places and print with at least one decimal
/// digit: `6.0`, `-2.5`, `1.125`.
pub fn format_delay(value: f64) -> String {
    let scale = 10f64.powi(DELAY_DECIMALS);
    let mut rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        // Avoid printing "-0.0".
        rounded = 0.0;
    }
    let text = format!("{rounded:.prec$}", prec = DELAY_DECIMALS as usize);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// Alpha is a small dimensionless ratio; print it at full precision.
fn format_alpha(alpha: f64) -> String {
    if alpha == 0.0 {
        "0".to_string()
    } else {
        alpha.to_string()
    }
}
