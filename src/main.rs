use std::{fs, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dynamic_alarm_icon::{
    alarm::FormattedAlarmQuery,
    init_logging,
    parcel::ParcelWriter,
    sync::IgnoreReason,
    AlarmEvent, AlarmSyncOrchestrator, NextAlarmSource, NotificationPosted, Outcome,
    RasterClockBackend, SettingsStore, SourceUnavailable, SurfaceId,
};

const FIXTURE_TITLE: &str = "Alarm";
const TITLE_VIEW_ID: i32 = 1;
const TEXT_VIEW_ID: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "alarm-icon-replay")]
#[command(about = "Replays captured alarm notifications through the clock icon pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a captured action stream and write the resulting icon as PNG.
    Replay {
        /// JSON preference file.
        settings: PathBuf,
        /// Raw notification action stream.
        stream: PathBuf,
        /// Output PNG path.
        out: PathBuf,
        /// Icon edge length in pixels.
        #[arg(default_value_t = 96)]
        size: u32,
    },
    /// Write an action stream with a title record and one setText record.
    Fixture { text: String, out: PathBuf },
}

/// Replays never touch the persistent slot, so the host setting reads empty.
struct NoFormattedAlarm;

impl FormattedAlarmQuery for NoFormattedAlarm {
    fn formatted_next_alarm(&self) -> Result<String, SourceUnavailable> {
        Ok(String::new())
    }
}

fn write_fixture(text: &str, out: PathBuf) -> Result<()> {
    let mut writer = ParcelWriter::new();
    writer.write_set_text(TITLE_VIEW_ID, FIXTURE_TITLE);
    writer.write_set_text(TEXT_VIEW_ID, text);
    let len = writer.len();

    fs::write(&out, writer.into_bytes())
        .with_context(|| format!("Failed to write fixture to {}", out.display()))?;
    log::info!("Wrote {len}-byte fixture to {}", out.display());
    Ok(())
}

fn replay(settings: PathBuf, stream: PathBuf, out: PathBuf, size: u32) -> Result<()> {
    let settings = SettingsStore::new(settings)?;
    let packages = settings.clock_packages();
    let package = packages
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("No clock packages configured"))?;

    let actions = fs::read(&stream)
        .with_context(|| format!("Failed to read action stream from {}", stream.display()))?;

    let mut sync = AlarmSyncOrchestrator::new(
        RasterClockBackend::new(size),
        NextAlarmSource::polled_text(NoFormattedAlarm),
        settings.icon_config(),
    )
    .with_packages(packages);

    let key = format!("{package}:0");
    let outcome = sync.handle(AlarmEvent::NotificationPosted(NotificationPosted {
        key: key.clone(),
        package,
        actions,
        title: Some(FIXTURE_TITLE.to_string()),
        has_expanded_view: false,
    }));

    match outcome {
        Outcome::Updated { time, .. } => {
            let icon = sync
                .icon(&SurfaceId::NotificationCompact(key))
                .ok_or_else(|| anyhow!("Icon missing after update"))?;
            icon.save_png(&out, icon.size())?;
            log::info!("Rendered {time} to {}", out.display());
            Ok(())
        }
        Outcome::Ignored(IgnoreReason::Decode(err)) => {
            Err(err).with_context(|| format!("Malformed action stream in {}", stream.display()))
        }
        Outcome::Ignored(reason) => bail!("Notification ignored: {reason:?}"),
        Outcome::RenderFailed(err) => Err(err).context("Failed to render clock icon"),
        other => bail!("Unexpected outcome: {other:?}"),
    }
}

fn main() -> Result<()> {
    init_logging();

    match Cli::parse().command {
        Command::Replay {
            settings,
            stream,
            out,
            size,
        } => replay(settings, stream, out, size),
        Command::Fixture { text, out } => write_fixture(&text, out),
    }
}
