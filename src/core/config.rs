use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_path: PathBuf,

    pub worker_count: usize,                    // requested sort workers, clamped per build
    pub default_min_score: f64,                 // threshold used when a query names none

    pub ingest_batch_size: usize,               // CSV rows parsed per rayon batch
    pub score_precision: usize,                 // decimals written for scores
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("./oopd_students.csv"),
            worker_count: num_cpus::get().max(2),
            default_min_score: 9.0,
            ingest_batch_size: 1000,
            score_precision: 6,
        }
    }
}

impl Config {
    /// Reads a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosterx.json");
        fs::write(&path, r#"{ "worker_count": 3 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.default_min_score, 9.0);
        assert_eq!(config.ingest_batch_size, 1000);
    }

    #[test]
    fn save_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rosterx.json");
        let config = Config {
            data_path: PathBuf::from("/tmp/students.csv"),
            worker_count: 8,
            ..Config::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
