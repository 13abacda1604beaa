use crate::config::LogFormat;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SantaConfig {
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    pub seed: Option<u64>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl SantaConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::{Captures, Regex};
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.roster.path {
            validation::validate_path("roster.path", path)?;
            validation::validate_file_extension(
                "roster.path",
                path,
                &crate::adapters::file::ROSTER_EXTENSIONS,
            )?;
        }

        if let Some(path) = &self.history.path {
            validation::validate_path("history.path", path)?;
            validation::validate_file_extension("history.path", path, &["json"])?;
        }

        if let Some(year) = self.solver.year {
            validation::validate_range("solver.year", year, 1900, 9999)?;
        }

        Ok(())
    }
}
