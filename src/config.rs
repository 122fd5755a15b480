use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Minimum modularity increase for another pass or another level.
pub(crate) const MIN_GAIN :f64 = 0.0000001;

/// Default pass limit of one level, `None` means unbounded.
pub(crate) const PASS_MAX :Option<usize> = None;

pub(crate) const READ_BUFFER_SIZE :usize = 16 * 1024 * 1024;

/// Tunables of the community detection engine.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LouvainConfig {
    /// Upper bound of local sweeps per level.
    pub pass_max: Option<usize>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        LouvainConfig {
            pass_max: PASS_MAX,
        }
    }
}

impl LouvainConfig {
    pub fn with_pass_max(pass_max: usize) -> Self {
        LouvainConfig {
            pass_max: Some(pass_max),
        }
    }
}

/// Settings of the command line tool, read from a yaml file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub louvain: LouvainConfig,
    /// Directory of the log file, logs go to stderr when absent.
    pub log_dir: Option<String>,
    /// Print json instead of plain lines.
    pub json: bool,
}

impl Settings {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let settings = serde_yaml::from_reader(file)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod test_config {
    use std::io::Write;

    use crate::config::{LouvainConfig, Settings};

    #[test]
    fn test_default_is_unbounded() {
        let config = LouvainConfig::default();
        assert_eq!(config.pass_max, None);
        assert_eq!(LouvainConfig::with_pass_max(3).pass_max, Some(3));
    }

    #[test]
    fn test_read_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "louvain:\n  pass_max: 4\nlog_dir: logs\n").unwrap();
        let settings = Settings::from_yaml_file(file.path()).unwrap();
        assert_eq!(settings.louvain.pass_max, Some(4));
        assert_eq!(settings.log_dir.as_deref(), Some("logs"));
        assert!(!settings.json);
    }

    #[test]
    fn test_partial_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "json: true").unwrap();
        let settings = Settings::from_yaml_file(file.path()).unwrap();
        assert!(settings.json);
        assert_eq!(settings.louvain, LouvainConfig::default());
    }
}
