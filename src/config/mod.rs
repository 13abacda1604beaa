#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::SantaConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Settings for one run after command-line flags are layered over the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub roster_path: PathBuf,
    pub history_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub year: Option<i32>,
}

impl RunConfig {
    /// Flags win over the file; the roster path is required from one of them.
    pub fn layered(
        file: Option<&SantaConfig>,
        roster_path: Option<PathBuf>,
        history_path: Option<PathBuf>,
        seed: Option<u64>,
        year: Option<i32>,
    ) -> Result<Self> {
        let from_file = file.cloned().unwrap_or_default();
        let roster_path = roster_path.or(from_file.roster.path);

        Ok(Self {
            roster_path: validation::validate_required_field("roster.path", &roster_path)?
                .clone(),
            history_path: history_path.or(from_file.history.path),
            seed: seed.or(from_file.solver.seed),
            year: year.or(from_file.solver.year),
        })
    }
}

impl ConfigProvider for RunConfig {
    fn roster_path(&self) -> &Path {
        &self.roster_path
    }

    fn history_path(&self) -> Option<&Path> {
        self.history_path.as_deref()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn year(&self) -> Option<i32> {
        self.year
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("roster.path", &self.roster_path)?;
        validation::validate_file_extension(
            "roster.path",
            &self.roster_path,
            &crate::adapters::file::ROSTER_EXTENSIONS,
        )?;

        if let Some(path) = &self.history_path {
            validation::validate_path("history.path", path)?;
            validation::validate_file_extension("history.path", path, &["json"])?;
        }

        if let Some(year) = self.year {
            validation::validate_range("year", year, 1900, 9999)?;
        }

        Ok(())
    }
}
