use std::{
    fmt::{Display, Write},
    path::PathBuf,
};

use getset::{CopyGetters, Getters};
use log::{error, info, warn};
use url::Url;

use crate::{
    api::{reqwest_client, PageSource, RetrievalError, Retriever},
    config::Config,
    export::{save_leaders, OutputFormat},
    parser::{self, ExtractOptions},
    schema::{LeaderSet, StatValue},
    statistic::Statistic,
};

#[derive(Clone, Debug)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub format: OutputFormat,
}

/// Fetches the leaders page and turns one of its tables into a [`Report`].
pub struct LeaderBoard<S> {
    retriever: Retriever<S>,
    url: Url,
    options: ExtractOptions,
    export: Option<ExportTarget>,
}

impl LeaderBoard<reqwest::Client> {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest_client(&config.user_agent, config.request_timeout)?;
        let export = config.save.then(|| ExportTarget {
            dir: config.output_dir.clone(),
            format: config.output_format,
        });
        Ok(Self::new(
            Retriever::new(client, config.retry_policy()),
            config.url.clone(),
            config.extract,
            export,
        ))
    }
}

impl<S: PageSource> LeaderBoard<S> {
    pub fn new(
        retriever: Retriever<S>,
        url: Url,
        options: ExtractOptions,
        export: Option<ExportTarget>,
    ) -> Self {
        Self {
            retriever,
            url,
            options,
            export,
        }
    }

    /// Downloads the page, extracts `statistic` and saves it if exporting is enabled.
    ///
    /// `Ok(None)` means the page had no usable table for `statistic`.
    /// A failed save is logged and leaves [`Report::saved_to`] empty.
    pub async fn fetch_leaders(
        &self,
        statistic: Statistic,
    ) -> Result<Option<Report>, RetrievalError> {
        let markup = self.retriever.fetch(&self.url).await?;
        let leaders = match parser::extract_from_str(&markup, statistic.table_id(), self.options) {
            Ok(Some(leaders)) if !leaders.is_empty() => leaders,
            Ok(_) => {
                warn!("No data found for {}", statistic.label());
                return Ok(None);
            }
            Err(e) => {
                error!("Error parsing HTML: {e}");
                return Ok(None);
            }
        };
        info!(
            "Extracted {} records for {}",
            leaders.len(),
            statistic.label()
        );

        let saved_to = self.export.as_ref().and_then(|target| {
            let now = chrono::Local::now().naive_local();
            match save_leaders(&target.dir, target.format, statistic, &leaders, now) {
                Ok(path) => path,
                Err(e) => {
                    error!("Error saving {}: {e}", target.format.extension());
                    None
                }
            }
        });

        Ok(Some(Report {
            statistic,
            leaders,
            saved_to,
        }))
    }
}

#[derive(Debug, Getters, CopyGetters)]
pub struct Report {
    #[getset(get_copy = "pub")]
    statistic: Statistic,
    #[getset(get = "pub")]
    leaders: LeaderSet,
    #[getset(get = "pub")]
    saved_to: Option<PathBuf>,
}

/// Renders a value for the console.
///
/// Percentages get one decimal and a `%` suffix.
/// The site prints them as fractions (`.482`), so values up to 1.0 are scaled by 100.
pub fn format_value(statistic: Statistic, value: Option<&StatValue>) -> String {
    match value {
        None => "N/A".to_owned(),
        Some(StatValue::Text(text)) => text.clone(),
        Some(&StatValue::Number(x)) if statistic.is_percentage() => {
            let x = if x.abs() <= 1.0 { x * 100.0 } else { x };
            format!("{x:.1}%")
        }
        Some(StatValue::Number(x)) => format!("{x:.1}"),
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = format!(
            "Top {} {} Leaders:",
            self.leaders.len(),
            self.statistic.display_name()
        );
        writeln!(f, "{title}")?;
        writeln!(f, "{}", "=".repeat(title.chars().count()))?;
        for (rank, record) in (1..).zip(self.leaders.iter()) {
            let mut line = format!("{rank}. {}", record.name());
            if !record.affiliation().is_empty() {
                write!(line, " ({})", record.affiliation())?;
            }
            write!(
                line,
                ": {}",
                format_value(self.statistic, record.value().as_ref())
            )?;
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
