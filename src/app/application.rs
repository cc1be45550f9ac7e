//! Application - Command Dispatch
//!
//! Turns a parsed [`Cli`] into controller calls and prints what the
//! controllers render. Notices are printed after every command.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chrono::Utc;
use tokio::io::BufReader;

use crate::app::entities::AppEntities;
use crate::cli::{
    Cli, Command, ConfigCommand, MeasurementsCommand, SystemFieldArgs, SystemsCommand,
    WeatherCommand,
};
use crate::components::chart::TerminalChart;
use crate::error::Result;
use crate::features::measurements::MeasurementsController;
use crate::features::systems::SystemsController;
use crate::features::weather::{WeatherController, run_watch};
use crate::i18n::t;
use crate::services::transport::ReqwestTransport;
use crate::state::NoticeState;
use crate::utils::config_store::save_config;
use crate::utils::time::{parse_date, today_in};

const CHART_WIDTH: usize = 48;

/// Run one command to completion
pub async fn run_app(cli: Cli, entities: AppEntities) -> anyhow::Result<ExitCode> {
    let ok = match cli.command {
        Command::Systems(command) => run_systems(command, &entities).await,
        Command::Measurements(command) => run_measurements(command, &entities).await?,
        Command::Weather(command) => run_weather(command, &entities).await?,
        Command::Config(command) => run_config(command, &entities)?,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_notices(notices: &NoticeState) {
    for notice in notices.entries() {
        println!("{notice}");
    }
}

/// y/N prompt on stdin
fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn fill_fields(ctl: &mut SystemsController<ReqwestTransport>, fields: &SystemFieldArgs) {
    for (name, value) in fields.entries() {
        ctl.form.set_field(name, value);
    }
    if let Some(active) = fields.active {
        ctl.form.fields.is_active = active;
    }
}

async fn run_systems(command: SystemsCommand, entities: &AppEntities) -> bool {
    let mut ctl = SystemsController::new(entities.api.clone(), entities.locale, &entities.config.viewer);

    let ok = match command {
        SystemsCommand::List {
            active,
            inactive,
            page,
        } => {
            let filter = match (active, inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            ctl.filter_active(filter);
            let loaded = ctl.refresh().await;
            if page > 1 {
                ctl.go_to(page);
            }
            println!("{}", ctl.render_list());
            loaded
        }
        SystemsCommand::Show {
            system_id,
            peak_sun_hours,
        } => match ctl.get(&system_id).await {
            Ok(system) => {
                println!("{}", ctl.render_detail(&system, peak_sun_hours));
                true
            }
            Err(e) => {
                ctl.notices.error(e.to_string());
                false
            }
        },
        SystemsCommand::Create {
            system_id,
            name,
            fields,
        } => {
            ctl.open_create();
            ctl.form.set_field("system_id", system_id);
            ctl.form.set_field("name", name);
            fill_fields(&mut ctl, &fields);
            ctl.submit().await.is_ok()
        }
        SystemsCommand::Update {
            system_id,
            name,
            fields,
        } => {
            if ctl.open_edit(&system_id).await.is_err() {
                false
            } else {
                if let Some(name) = name {
                    ctl.form.set_field("name", name);
                }
                fill_fields(&mut ctl, &fields);
                ctl.submit().await.is_ok()
            }
        }
        SystemsCommand::Delete { system_id, yes } => {
            let result = if yes {
                ctl.delete(&system_id, &mut |_: &str| true).await
            } else {
                ctl.delete(&system_id, &mut confirm_on_stdin).await
            };
            result.is_ok()
        }
    };

    print_notices(&ctl.notices);
    ok
}

async fn run_measurements(command: MeasurementsCommand, entities: &AppEntities) -> Result<bool> {
    let renderer = TerminalChart::new(io::stdout(), CHART_WIDTH);
    let mut ctl = MeasurementsController::new(
        entities.api.clone(),
        renderer,
        entities.tz,
        entities.locale,
        &entities.config.viewer,
    );
    let now = Utc::now();
    let day = |date: Option<String>| match date {
        Some(raw) => parse_date(&raw),
        None => Ok(today_in(entities.tz, now)),
    };

    let ok = match command {
        MeasurementsCommand::View { system, date, page } => {
            let loaded = ctl.load(&system, day(date)?, now).await;
            if page > 1 {
                ctl.go_to(page);
            }
            println!("{}", ctl.render_table());
            loaded
        }
        MeasurementsCommand::Export { system, date, out } => {
            ctl.load(&system, day(date)?, now).await && ctl.export(&out).is_ok()
        }
    };

    print_notices(&ctl.notices);
    Ok(ok)
}

async fn run_weather(command: WeatherCommand, entities: &AppEntities) -> Result<bool> {
    let renderer = TerminalChart::new(io::stdout(), CHART_WIDTH);
    let mut ctl = WeatherController::new(
        entities.api.clone(),
        renderer,
        entities.tz,
        entities.locale,
        &entities.config.viewer,
        &entities.config.weather,
    );

    if ctl.load_systems().await.is_err() {
        print_notices(&ctl.notices);
        return Ok(false);
    }

    let (WeatherCommand::Show { system } | WeatherCommand::Watch { system }) = &command;
    if let Some(system_id) = system
        && ctl.select(system_id).is_none()
    {
        print_notices(&ctl.notices);
        return Ok(false);
    }

    match command {
        WeatherCommand::Show { .. } => {
            ctl.ensure_selected()?;
            // Current conditions first, then the forecast
            ctl.refresh_current().await;
            println!("{}", ctl.render_current());
            ctl.refresh_forecast().await;
            if let Some(updated) = ctl.forecast_updated() {
                println!("{}: {}", t(entities.locale, "weather-updated"), updated);
            }
            print_notices(&ctl.notices);
            Ok(true)
        }
        WeatherCommand::Watch { .. } => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = io::stdout();
            run_watch(&mut ctl, &entities.config.poll, entities.locale, stdin, &mut stdout).await?;
            Ok(true)
        }
    }
}

fn run_config(command: ConfigCommand, entities: &AppEntities) -> Result<bool> {
    match command {
        ConfigCommand::Show => {
            println!("# {}", entities.config_path.display());
            print!("{}", toml::to_string_pretty(&entities.config)?);
            Ok(true)
        }
        ConfigCommand::Init { force } => {
            if entities.config_path.exists() && !force {
                eprintln!(
                    "{} already exists; pass --force to overwrite",
                    entities.config_path.display()
                );
                return Ok(false);
            }
            save_config(&entities.config_path, &entities.config)?;
            println!("{}", entities.config_path.display());
            Ok(true)
        }
    }
}
