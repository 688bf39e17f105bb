use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ChartError;

/// Tool settings. The calendar week is the only required input; everything
/// else has a default matching the weekly data layout on disk.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub ohlc_dir: PathBuf,
    pub volume_dir: PathBuf,
    pub output: PathBuf,
    pub symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            ohlc_dir: PathBuf::from("data/ohlc"),
            volume_dir: PathBuf::from("data/vol"),
            output: PathBuf::from("chart.html"),
            symbol: "BTC-USDT".to_string(),
        }
    }
}

/// The three weekly files one calendar-week selection resolves to: the
/// previous week's volume profile and candles, and the current week's
/// candles. The strategy is evaluated in the current week against the
/// previous week's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekFiles {
    pub volume_prev: PathBuf,
    pub ohlc_prev: PathBuf,
    pub ohlc_current: PathBuf,
    pub previous_week: u32,
    pub current_week: u32,
}

impl Settings {
    /// Resolves a calendar week to its input file paths. Files are named
    /// `<week>.csv` under each data root. A selection naming a file that does
    /// not exist surfaces later as `FileNotFound` when loaded.
    pub fn week_files(&self, calendar_week: u32) -> Result<WeekFiles, ChartError> {
        let previous = calendar_week.checked_sub(1).ok_or_else(|| {
            ChartError::Config("calendar week 0 has no previous week to compare against".to_string())
        })?;
        Ok(WeekFiles {
            volume_prev: self.volume_dir.join(format!("{previous}.csv")),
            ohlc_prev: self.ohlc_dir.join(format!("{previous}.csv")),
            ohlc_current: self.ohlc_dir.join(format!("{calendar_week}.csv")),
            previous_week: previous,
            current_week: calendar_week,
        })
    }
}
