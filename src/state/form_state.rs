//! FormState - Create/Edit Form for a System
//!
//! Fields are held as the raw text the user typed. Parsing and validation
//! happen once, on submit.

use crate::domain::system::{System, SystemPayload, derive_capacity_kw};
use crate::error::{Error, Result};
use crate::i18n::{Locale, t};

/// Whether the form creates a new system or edits an existing one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit { system_id: String },
}

/// Raw field values
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub system_id: String,
    pub name: String,
    /// Used only when capacity can't be derived from the panel layout
    pub capacity: String,
    pub panel_count: String,
    pub panel_wattage: String,
    pub inverter_model: String,
    pub latitude: String,
    pub longitude: String,
    pub tilt_angle: String,
    pub azimuth: String,
    pub is_active: bool,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            system_id: String::new(),
            name: String::new(),
            capacity: String::new(),
            panel_count: String::new(),
            panel_wattage: String::new(),
            inverter_model: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            tilt_angle: String::new(),
            azimuth: String::new(),
            is_active: true,
        }
    }
}

fn text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Blank or unparseable input is absent
fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer input; a decimal keeps its integer part
fn parse_i64(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_f64(raw).map(|v| v.trunc() as i64))
}

impl FormFields {
    pub fn from_system(system: &System) -> Self {
        Self {
            system_id: system.system_id.clone(),
            name: system.name.clone(),
            capacity: text(system.capacity_kw),
            panel_count: text(system.panel_count),
            panel_wattage: text(system.panel_wattage),
            inverter_model: system.inverter_model.clone().unwrap_or_default(),
            latitude: text(system.latitude),
            longitude: text(system.longitude),
            tilt_angle: text(system.tilt_angle),
            azimuth: text(system.azimuth),
            is_active: system.is_active,
        }
    }

    /// Validate and build the request body
    ///
    /// Identifier and name are trimmed and must be non-empty. Capacity is
    /// derived from the panel layout when possible, otherwise the capacity
    /// field is sent as typed.
    pub fn to_payload(&self, locale: Locale) -> Result<SystemPayload> {
        let system_id = self.system_id.trim();
        let name = self.name.trim();
        if system_id.is_empty() {
            return Err(Error::Validation {
                message: t(locale, "validation-id-required"),
            });
        }
        if name.is_empty() {
            return Err(Error::Validation {
                message: t(locale, "validation-name-required"),
            });
        }

        let panel_count = parse_i64(&self.panel_count);
        let panel_wattage = parse_f64(&self.panel_wattage);
        let capacity = derive_capacity_kw(panel_count, panel_wattage).or_else(|| parse_f64(&self.capacity));
        let inverter_model = Some(self.inverter_model.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(SystemPayload {
            system_id: system_id.to_string(),
            name: name.to_string(),
            capacity,
            panel_count,
            panel_wattage,
            inverter_model,
            latitude: parse_f64(&self.latitude),
            longitude: parse_f64(&self.longitude),
            tilt_angle: parse_f64(&self.tilt_angle),
            azimuth: parse_f64(&self.azimuth),
            is_active: self.is_active,
        })
    }
}

/// The system form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub fields: FormFields,
    mode: FormMode,
    open: bool,
}

impl FormState {
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The identifier can't be changed while editing
    pub fn is_id_locked(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// i18n key of the submit button label
    pub fn submit_label_key(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "form-create",
            FormMode::Edit { .. } => "form-update",
        }
    }

    pub fn open_create(&mut self) {
        self.fields = FormFields::default();
        self.mode = FormMode::Create;
        self.open = true;
    }

    pub fn open_edit(&mut self, system: &System) {
        self.fields = FormFields::from_system(system);
        self.mode = FormMode::Edit {
            system_id: system.system_id.clone(),
        };
        self.open = true;
    }

    /// Clear everything and go back to create mode
    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Set a text field by name, ignoring the locked identifier
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match field {
            "system_id" if self.is_id_locked() => return false,
            "system_id" => &mut self.fields.system_id,
            "name" => &mut self.fields.name,
            "capacity" => &mut self.fields.capacity,
            "panel_count" => &mut self.fields.panel_count,
            "panel_wattage" => &mut self.fields.panel_wattage,
            "inverter_model" => &mut self.fields.inverter_model,
            "latitude" => &mut self.fields.latitude,
            "longitude" => &mut self.fields.longitude,
            "tilt_angle" => &mut self.fields.tilt_angle,
            "azimuth" => &mut self.fields.azimuth,
            "is_active" => {
                self.fields.is_active = matches!(value.trim(), "true" | "1" | "yes");
                return true;
            }
            _ => return false,
        };
        *slot = value;
        true
    }
}
