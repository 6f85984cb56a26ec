use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};
use serde::Deserialize;

use crate::{schema::LeaderSet, statistic::Statistic};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
}
impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv => b'\t',
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to serialize rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}

/// `<slug>_<YYYYMMDD_HHMMSS>.<ext>`
pub fn file_name(statistic: Statistic, format: OutputFormat, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        statistic.slug(),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Serializes `leaders` with the header `Player, Team, <display name>`.
pub fn to_bytes(
    statistic: Statistic,
    format: OutputFormat,
    leaders: &LeaderSet,
) -> Result<Vec<u8>, PersistenceError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(vec![]);
    let header = statistic.display_name();
    writer.write_record(["Player", "Team", header.as_str()])?;
    for record in leaders.iter() {
        let value = record
            .value()
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        writer.write_record([
            record.name().as_str(),
            record.affiliation().as_str(),
            value.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Writes `leaders` into `dir`, creating it if needed.
///
/// The file is written in one go, so it is never left half-written.
/// Returns `Ok(None)` without touching the disk if there is nothing to save.
pub fn save_leaders(
    dir: &Path,
    format: OutputFormat,
    statistic: Statistic,
    leaders: &LeaderSet,
    timestamp: NaiveDateTime,
) -> Result<Option<PathBuf>, PersistenceError> {
    if leaders.is_empty() {
        warn!("No data to save to {}.", format.extension());
        return Ok(None);
    }
    let bytes = to_bytes(statistic, format, leaders)?;
    fs_err::create_dir_all(dir)?;
    let path = dir.join(file_name(statistic, format, timestamp));
    fs_err::write(&path, bytes)?;
    info!("Data saved to {path:?}");
    Ok(Some(path))
}
