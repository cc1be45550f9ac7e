//! System - Monitored PV Installation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::deserialize_opt_instant;

/// A photovoltaic system as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// Unique, immutable identifier (e.g., "PV-001")
    pub system_id: String,
    /// System name or label
    pub name: String,
    /// Installed capacity (kW)
    #[serde(default, rename = "capacity")]
    pub capacity_kw: Option<f64>,
    /// Number of panels
    #[serde(default)]
    pub panel_count: Option<i64>,
    /// Individual panel wattage (W)
    #[serde(default)]
    pub panel_wattage: Option<f64>,
    /// Inverter model/type
    #[serde(default)]
    pub inverter_model: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Panel tilt angle (degrees)
    #[serde(default)]
    pub tilt_angle: Option<f64>,
    /// Panel azimuth (degrees)
    #[serde(default)]
    pub azimuth: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Free-form address
    #[serde(default, skip_serializing)]
    pub location: Option<String>,
    /// Reverse-geocoded place name filled in by the backend
    #[serde(default, skip_serializing)]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing, deserialize_with = "deserialize_opt_instant")]
    pub installation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing, deserialize_with = "deserialize_opt_instant")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl System {
    /// Capacity shown to the user: derived from the panel layout when possible
    pub fn display_capacity(&self) -> Option<f64> {
        derive_capacity_kw(self.panel_count, self.panel_wattage).or(self.capacity_kw)
    }

    /// Location column text
    pub fn display_location(&self) -> String {
        match &self.location_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "📍 {},{}",
                self.latitude.map_or("-".to_string(), |v| v.to_string()),
                self.longitude.map_or("-".to_string(), |v| v.to_string())
            ),
        }
    }

    /// Select-box label, e.g. "Rooftop (PV-001)"
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.system_id)
    }
}

/// Body sent on create/update
///
/// Server-assigned fields are never part of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemPayload {
    pub system_id: String,
    pub name: String,
    pub capacity: Option<f64>,
    pub panel_count: Option<i64>,
    pub panel_wattage: Option<f64>,
    pub inverter_model: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tilt_angle: Option<f64>,
    pub azimuth: Option<f64>,
    pub is_active: bool,
}

/// `panel_count * panel_wattage / 1000` when both are present and non-zero
pub fn derive_capacity_kw(panel_count: Option<i64>, panel_wattage: Option<f64>) -> Option<f64> {
    match (panel_count, panel_wattage) {
        (Some(count), Some(watts)) if count != 0 && watts != 0.0 => {
            Some(count as f64 * watts / 1000.0)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_capacity() {
        assert_eq!(derive_capacity_kw(Some(20), Some(450.0)), Some(9.0));
        assert_eq!(derive_capacity_kw(Some(40), Some(250.0)), Some(10.0));
    }

    #[test]
    fn test_derive_capacity_needs_both_operands() {
        assert_eq!(derive_capacity_kw(None, Some(450.0)), None);
        assert_eq!(derive_capacity_kw(Some(20), None), None);
        assert_eq!(derive_capacity_kw(Some(0), Some(450.0)), None);
        assert_eq!(derive_capacity_kw(Some(20), Some(0.0)), None);
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": 7,
            "system_id": "PV-001",
            "name": "Rooftop Solar Array",
            "capacity": 10.0,
            "panel_count": 40,
            "panel_wattage": 250.0,
            "location_name": "Hangzhou",
            "is_active": false,
            "created_at": "2026-01-01T00:00:00",
            "updated_at": "2026-01-02T08:30:00"
        }"#;
        let system: System = serde_json::from_str(json).expect("system");
        assert_eq!(system.capacity_kw, Some(10.0));
        assert!(!system.is_active);
        assert_eq!(system.display_location(), "Hangzhou");
        assert!(system.updated_at.is_some());
    }

    #[test]
    fn test_display_location_without_name() {
        let system: System =
            serde_json::from_str(r#"{"system_id":"a","name":"b","latitude":30.5}"#).expect("system");
        assert!(system.is_active);
        assert_eq!(system.display_location(), "📍 30.5,-");
    }
}
