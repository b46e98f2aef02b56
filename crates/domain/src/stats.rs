//! System and Pi-hole statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host resource usage reported by `system/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    /// CPU usage in percent.
    pub cpu: f64,
    /// RAM usage in percent.
    pub ram: f64,
    /// Root disk usage in percent.
    pub disk: f64,
    /// Temperature in °C (0 when the host has no sensor).
    pub temp: f64,
}

impl fmt::Display for SystemStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU {}%  RAM {}%  Disk {}%  Temp {}°C",
            self.cpu, self.ram, self.disk, self.temp
        )
    }
}

/// Pi-hole query counters.
///
/// The backend sends pre-formatted strings (`"12,345"`, or `"N/A"` when
/// Pi-hole is unreachable), so no numeric parsing happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiholeStats {
    pub blocked: String,
    pub total: String,
    #[serde(rename = "blockRate")]
    pub block_rate: String,
}
