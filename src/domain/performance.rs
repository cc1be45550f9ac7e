//! Performance - PV Yield Figures

use crate::constants::DEFAULT_SYSTEM_EFFICIENCY;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimated daily yield (kWh): `capacity * peak sun hours * efficiency`
pub fn estimate_daily_energy(capacity_kw: f64, peak_sun_hours: f64, system_efficiency: Option<f64>) -> f64 {
    round2(capacity_kw * peak_sun_hours * system_efficiency.unwrap_or(DEFAULT_SYSTEM_EFFICIENCY))
}
