use std::{fmt::Debug, num::NonZeroU32, path::PathBuf, time::Duration};

use bbref_leaders_utils::fs_toml_util::read_toml_if_exists;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use url::Url;

use crate::{
    api::{RetryPolicy, BROWSER_USER_AGENT},
    export::OutputFormat,
    parser::ExtractOptions,
};

pub const DEFAULT_URL: &str = "https://www.basketball-reference.com/leagues/NBA_2025_leaders.html";

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub url: Url,
    pub user_agent: String,
    pub max_retries: NonZeroU32,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub base_delay: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_timeout: Duration,
    pub save: bool,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub log_path: PathBuf,
    pub extract: ExtractOptions,
}

impl Default for Config {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            url: Url::parse(DEFAULT_URL).expect("DEFAULT_URL is a valid URL"),
            user_agent: BROWSER_USER_AGENT.to_owned(),
            max_retries: retry.max_retries,
            base_delay: retry.base_delay,
            request_timeout: Duration::from_secs(10),
            save: true,
            output_dir: "data".into(),
            output_format: OutputFormat::default(),
            log_path: "scraper.log".into(),
            extract: ExtractOptions::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// The second element is `false` if the file was not found and defaults were used.
    pub fn load<P: Into<PathBuf> + Debug>(path: P) -> anyhow::Result<(Self, bool)> {
        Ok(match read_toml_if_exists(path)? {
            Some(config) => (config, true),
            None => (Self::default(), false),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Config;
    use crate::{export::OutputFormat, parser::ExtractOptions};

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.url.as_str(), super::DEFAULT_URL);
        assert_eq!(config.max_retries.get(), 3);
        assert_eq!(config.base_delay, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.save);
        assert_eq!(config.output_dir.to_str(), Some("data"));
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.extract, ExtractOptions::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            max_retries = 5
            base_delay = 1
            output_format = "tsv"

            [extract]
            coerce_numeric = false
            "#,
        )
        .unwrap();
        assert_eq!(config.max_retries.get(), 5);
        assert_eq!(config.retry_policy().base_delay, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.output_format, OutputFormat::Tsv);
        assert!(config.extract.split_affiliation);
        assert!(!config.extract.coerce_numeric);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(toml::from_str::<Config>("max_retries = 0").is_err());
        assert!(toml::from_str::<Config>("url = \"not a url\"").is_err());
        assert!(toml::from_str::<Config>("output_format = \"xlsx\"").is_err());
        assert!(toml::from_str::<Config>("retries = 3").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, found) = Config::load(dir.path().join("leaders.toml")).unwrap();
        assert!(!found);
        assert_eq!(config.max_retries.get(), 3);
    }

    #[test]
    fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaders.toml");
        std::fs::write(&path, "save = false\noutput_dir = \"out\"\n").unwrap();
        let (config, found) = Config::load(&path).unwrap();
        assert!(found);
        assert!(!config.save);
        assert_eq!(config.output_dir.to_str(), Some("out"));
    }
}
