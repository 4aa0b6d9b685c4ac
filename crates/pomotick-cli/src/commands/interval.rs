use std::io::Write;
use std::time::Duration;

use pomotick_core::{
    get_interval, next_category, open_repository, Callbacks, Config, Interval, IntervalConfig,
    IntervalState, RepositoryError,
};
use tokio_util::sync::CancellationToken;

/// Interval lengths given on the command line; they win over the config file.
pub struct Overrides {
    pub pomodoro_min: Option<u64>,
    pub short_break_min: Option<u64>,
    pub long_break_min: Option<u64>,
}

fn load_config(overrides: &Overrides) -> Result<IntervalConfig, Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(min) = overrides.pomodoro_min {
        config.intervals.pomodoro_min = min;
    }
    if let Some(min) = overrides.short_break_min {
        config.intervals.short_break_min = min;
    }
    if let Some(min) = overrides.long_break_min {
        config.intervals.long_break_min = min;
    }
    let repo = open_repository(&config)?;
    Ok(config.interval_config(repo))
}

fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn progress_line(i: &Interval) -> String {
    format!(
        "{} #{} {} / {}",
        i.category,
        i.id,
        clock(i.actual_duration),
        clock(i.planned_duration)
    )
}

pub fn start(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(overrides)?;
    let interval = get_interval(&config)?;

    if interval.state == IntervalState::Running {
        println!(
            "{} #{} is already running; run `pomotick pause` first to take it over",
            interval.category, interval.id
        );
        return Ok(());
    }

    let mut callbacks = Callbacks::new(
        |i| println!("{} #{} started, {} left", i.category, i.id, clock(i.remaining())),
        |i| {
            print!("\r{}", progress_line(i));
            let _ = std::io::stdout().flush();
        },
        |i| println!("\n{} #{} done", i.category, i.id),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_signal.cancel();
            }
        });
        pomotick_core::start(&interval, &config, &mut callbacks, &cancel).await
    })?;
    drop(callbacks);

    let finished = config.repo().by_id(interval.id)?;
    match finished.state {
        IntervalState::Cancelled => println!("\n{} #{} cancelled", finished.category, finished.id),
        IntervalState::Paused => println!("\n{} #{} paused", finished.category, finished.id),
        _ => {}
    }
    Ok(())
}

pub fn pause(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(overrides)?;
    let last = config.repo().last()?;
    pomotick_core::pause(&last, &config)?;
    println!("paused {}", progress_line(&last));
    Ok(())
}

pub fn status(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(overrides)?;
    let current = match config.repo().last() {
        Ok(interval) => Some(interval),
        Err(RepositoryError::NoIntervals) => None,
        Err(e) => return Err(e.into()),
    };
    let mut status = serde_json::json!({ "current": current });
    // A live interval is what `start` resumes, so no next category applies.
    if current.as_ref().map_or(true, |i| i.state.is_terminal()) {
        status["next_category"] = serde_json::to_value(next_category(config.repo())?)?;
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
