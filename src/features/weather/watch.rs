//! Weather Watch
//!
//! Interactive dashboard loop. Poll ticks, typed commands and finished
//! fetches are multiplexed on one task; fetches run on spawned tasks and
//! report back with the token they were started under.

use std::io::Write;

use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinSet;

use crate::components::chart::ChartRenderer;
use crate::domain::config::PollConfig;
use crate::domain::weather::CurrentWeather;
use crate::error::Result;
use crate::i18n::{Locale, t};
use crate::services::scheduler::{PollKind, PollScheduler};
use crate::services::transport::HttpTransport;
use crate::state::FetchToken;

use super::controller::{ForecastBundle, WeatherController};

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Select(String),
    Refresh,
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> Option<WatchCommand> {
    let mut words = line.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("select" | "s", Some(id)) => WatchCommand::Select(id.to_string()),
        ("refresh" | "r", None) => WatchCommand::Refresh,
        ("quit" | "q" | "exit", None) => WatchCommand::Quit,
        _ => WatchCommand::Help,
    };
    Some(command)
}

enum Fetched {
    Current(FetchToken, Result<CurrentWeather>),
    Forecast(FetchToken, Result<ForecastBundle>),
}

fn spawn_fetch<T, R>(
    inflight: &mut JoinSet<Fetched>,
    controller: &WeatherController<T, R>,
    kind: PollKind,
) where
    T: HttpTransport + 'static,
    R: ChartRenderer,
{
    let Some((token, system_id)) = controller.refresh_target() else {
        return;
    };
    let fetcher = controller.fetcher();
    match kind {
        PollKind::CurrentConditions => {
            inflight.spawn(async move { Fetched::Current(token, fetcher.current(&system_id).await) });
        }
        PollKind::Forecast => {
            inflight.spawn(async move { Fetched::Forecast(token, fetcher.forecast(&system_id).await) });
        }
    }
}

fn spawn_both<T, R>(inflight: &mut JoinSet<Fetched>, controller: &WeatherController<T, R>)
where
    T: HttpTransport + 'static,
    R: ChartRenderer,
{
    spawn_fetch(inflight, controller, PollKind::CurrentConditions);
    spawn_fetch(inflight, controller, PollKind::Forecast);
}

fn apply<T, R, W>(controller: &mut WeatherController<T, R>, fetched: Fetched, out: &mut W) -> Result<()>
where
    T: HttpTransport,
    R: ChartRenderer,
    W: Write,
{
    match fetched {
        Fetched::Current(token, result) => {
            if controller.apply_current(token, result) && controller.current().is_some() {
                writeln!(out, "{}", controller.render_current())?;
            }
        }
        Fetched::Forecast(token, result) => {
            if controller.apply_forecast(token, result, Utc::now())
                && let Some(updated) = controller.forecast_updated()
            {
                writeln!(out, "{}: {}", t(controller.locale(), "weather-updated"), updated)?;
            }
        }
    }
    Ok(())
}

fn flush_notices<T, R, W>(controller: &WeatherController<T, R>, seen: &mut u64, out: &mut W) -> Result<()>
where
    T: HttpTransport,
    R: ChartRenderer,
    W: Write,
{
    let since = *seen;
    for notice in controller.notices.entries().filter(|n| n.id > since) {
        writeln!(out, "{notice}")?;
        *seen = notice.id;
    }
    Ok(())
}

/// Run until `quit` or end of input
///
/// At end of input the fetches still in flight are awaited and applied;
/// `quit` abandons them. Timers are cancelled either way.
pub async fn run_watch<T, R, I, W>(
    controller: &mut WeatherController<T, R>,
    poll: &PollConfig,
    locale: Locale,
    input: I,
    out: &mut W,
) -> Result<()>
where
    T: HttpTransport + 'static,
    R: ChartRenderer,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let (tick_tx, mut ticks) = unbounded_channel();
    let mut scheduler = PollScheduler::start(poll, tick_tx);
    let mut inflight = JoinSet::new();
    let mut seen = 0;
    let mut lines = input.lines();

    writeln!(out, "{}", t(locale, "weather-watch-help"))?;
    spawn_both(&mut inflight, controller);

    let outcome: Result<()> = async {
        loop {
            flush_notices(controller, &mut seen, out)?;
            tokio::select! {
                biased;

                Some(joined) = inflight.join_next(), if !inflight.is_empty() => match joined {
                    Ok(fetched) => apply(controller, fetched, out)?,
                    Err(e) => tracing::warn!("Weather fetch task failed: {}", e),
                },
                Some(kind) = ticks.recv() => {
                    tracing::debug!("Poll tick: {:?}", kind);
                    spawn_fetch(&mut inflight, controller, kind);
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        while let Some(joined) = inflight.join_next().await {
                            if let Ok(fetched) = joined {
                                apply(controller, fetched, out)?;
                            }
                        }
                        break;
                    };
                    match parse_command(&line) {
                        None => {}
                        Some(WatchCommand::Select(id)) => {
                            if controller.select(&id).is_some() {
                                spawn_both(&mut inflight, controller);
                            }
                        }
                        Some(WatchCommand::Refresh) => spawn_both(&mut inflight, controller),
                        Some(WatchCommand::Quit) => break,
                        Some(WatchCommand::Help) => writeln!(out, "{}", t(locale, "weather-watch-help"))?,
                    }
                }
            }
        }
        flush_notices(controller, &mut seen, out)
    }
    .await;

    inflight.abort_all();
    scheduler.shutdown();
    tracing::info!("Weather watch stopped");
    outcome
}
