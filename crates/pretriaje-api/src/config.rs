//! Runtime configuration, read from the environment once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use eyre::{WrapErr, eyre};

use pretriaje_core::models::questionnaire::Questionnaire;
use pretriaje_triage::schema;

pub const BIND_VAR: &str = "PRETRIAJE_BIND";
pub const DATA_DIR_VAR: &str = "PRETRIAJE_DATA_DIR";
pub const QUESTIONNAIRE_VAR: &str = "PRETRIAJE_QUESTIONNAIRE";
pub const SEED_DEMO_VAR: &str = "PRETRIAJE_SEED_DEMO";

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    /// Directory for the file store. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Questionnaire JSON to serve instead of the bundled one.
    pub questionnaire_path: Option<PathBuf>,
    /// Insert the demo sessions at startup.
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = var(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse()
            .map_err(|e| eyre!("invalid {BIND_VAR} {bind_raw:?}: {e}"))?;

        let seed_demo = match var(SEED_DEMO_VAR) {
            Some(v) => parse_flag(&v).ok_or_else(|| eyre!("invalid {SEED_DEMO_VAR} {v:?}"))?,
            None => false,
        };

        Ok(Self {
            bind,
            data_dir: var(DATA_DIR_VAR).map(PathBuf::from),
            questionnaire_path: var(QUESTIONNAIRE_VAR).map(PathBuf::from),
            seed_demo,
        })
    }

    pub fn load_questionnaire(&self) -> eyre::Result<Questionnaire> {
        match &self.questionnaire_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("reading questionnaire {}", path.display()))?;
                let questionnaire = Questionnaire::from_json(&json)
                    .wrap_err_with(|| format!("parsing questionnaire {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    version = %questionnaire.version,
                    "questionnaire loaded"
                );
                Ok(questionnaire)
            }
            None => Ok(schema::default_questionnaire()?),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
