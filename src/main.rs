use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use cwchart::chart;
use cwchart::config::Settings;
use cwchart::data::{self, RecordTable};
use cwchart::schema::{RecordKind, SchemaRegistry};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let (settings, week) = parse_args(env::args().skip(1))?;
    let files = settings.week_files(week)?;
    info!(
        week,
        volume = %files.volume_prev.display(),
        candles_prev = %files.ohlc_prev.display(),
        candles_current = %files.ohlc_current.display(),
        "selected weekly input files"
    );

    let registry = SchemaRegistry::new();

    let volume = data::load(&registry, RecordKind::VolumeProfile, &files.volume_prev)?;
    let prev = data::load(&registry, RecordKind::Candle, &files.ohlc_prev)?;
    let current = data::load(&registry, RecordKind::Candle, &files.ohlc_current)?;
    info!(
        prev_rows = prev.len(),
        current_rows = current.len(),
        volume_rows = volume.len(),
        "loaded weekly data"
    );

    let mut candles = RecordTable::concat(prev, current)?;
    candles.format_open_time()?;

    let title = format!(
        "{} OHLC with volume in calendar week: vol={} and ohlc=[{} | {}]",
        settings.symbol, files.previous_week, files.previous_week, files.current_week
    );
    let html = chart::render(&registry, &candles, &volume, &title)?;
    std::fs::write(&settings.output, html)
        .with_context(|| format!("failed to write chart to {}", settings.output.display()))?;
    info!(output = %settings.output.display(), "chart written; open it in a browser");
    Ok(())
}

const USAGE: &str = "usage: cwchart <calendar_week> [--ohlc-dir DIR] [--vol-dir DIR] [--out FILE] [--symbol SYM]";

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<(Settings, u32)> {
    let mut settings = Settings::default();
    let mut week: Option<u32> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ohlc-dir" => settings.ohlc_dir = PathBuf::from(flag_value(&mut args, "--ohlc-dir")?),
            "--vol-dir" => settings.volume_dir = PathBuf::from(flag_value(&mut args, "--vol-dir")?),
            "--out" => settings.output = PathBuf::from(flag_value(&mut args, "--out")?),
            "--symbol" => settings.symbol = flag_value(&mut args, "--symbol")?,
            other if week.is_none() => {
                week = Some(
                    other
                        .parse()
                        .with_context(|| format!("calendar week must be an integer, got '{other}'"))?,
                );
            }
            other => bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }
    let week = week.ok_or_else(|| anyhow!(USAGE))?;
    Ok((settings, week))
}

fn flag_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("{flag} requires a value"))
}
