//! Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pv-console")]
#[command(about = "Admin and data-visualization console for the PV monitoring service")]
#[command(version)]
pub struct Cli {
    /// Config file; defaults to the per-user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// UI language ("zh" or "en")
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage monitored systems
    #[command(subcommand)]
    Systems(SystemsCommand),
    /// Browse and export daily measurements
    #[command(subcommand)]
    Measurements(MeasurementsCommand),
    /// Current conditions and forecast
    #[command(subcommand)]
    Weather(WeatherCommand),
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum SystemsCommand {
    /// List systems, one page at a time
    List {
        /// Only active systems
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Only inactive systems
        #[arg(long)]
        inactive: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one system with its daily energy estimate
    Show {
        system_id: String,
        #[arg(long)]
        peak_sun_hours: Option<f64>,
    },
    /// Register a new system
    Create {
        #[arg(long = "id")]
        system_id: String,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        fields: SystemFieldArgs,
    },
    /// Edit an existing system; omitted fields keep their value
    Update {
        system_id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: SystemFieldArgs,
    },
    /// Delete a system
    Delete {
        system_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

/// Optional system fields, passed as entered
#[derive(Debug, Default, Args)]
pub struct SystemFieldArgs {
    /// Capacity in kW, used when panel count and wattage are not both given
    #[arg(long)]
    pub capacity: Option<String>,
    #[arg(long)]
    pub panel_count: Option<String>,
    #[arg(long)]
    pub panel_wattage: Option<String>,
    #[arg(long)]
    pub inverter_model: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,
    #[arg(long)]
    pub tilt_angle: Option<String>,
    #[arg(long)]
    pub azimuth: Option<String>,
    /// Active flag ("true" or "false")
    #[arg(long)]
    pub active: Option<bool>,
}

impl SystemFieldArgs {
    /// `(form field, value)` pairs for the fields that were given
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("capacity", &self.capacity),
            ("panel_count", &self.panel_count),
            ("panel_wattage", &self.panel_wattage),
            ("inverter_model", &self.inverter_model),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
            ("tilt_angle", &self.tilt_angle),
            ("azimuth", &self.azimuth),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Subcommand)]
pub enum MeasurementsCommand {
    /// Table and charts for one day
    View {
        #[arg(long)]
        system: String,
        /// YYYY-MM-DD; today in the backend zone when omitted
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Write one day to CSV
    Export {
        #[arg(long)]
        system: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum WeatherCommand {
    /// Print current conditions and forecast charts once
    Show {
        /// First system when omitted
        #[arg(long)]
        system: Option<String>,
    },
    /// Keep polling; reads `select <id>`, `refresh`, `quit` from stdin
    Watch {
        #[arg(long)]
        system: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the defaults to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
