use std::path::PathBuf;

use activity::{ActivityRegistry, SchedulerConfig, DEFAULT_MOVES_PER_TURN};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MOVES_PER_TURN_ENV_VAR: &str = "ACTSIM_MOVES_PER_TURN";
const MAX_TICKS_ENV_VAR: &str = "ACTSIM_MAX_TICKS";
const SAVE_DIR_ENV_VAR: &str = "ACTSIM_SAVE_DIR";
const DEFAULT_MAX_TICKS: u32 = 500;
const DEFAULT_SAVE_DIR: &str = "cache/saves";

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimConfig {
    pub moves_per_turn: i32,
    pub max_ticks: u32,
    pub save_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            moves_per_turn: DEFAULT_MOVES_PER_TURN,
            max_ticks: DEFAULT_MAX_TICKS,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

impl SimConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Unset or blank variables keep their defaults.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| {
            lookup(var)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = read(MOVES_PER_TURN_ENV_VAR) {
            config.moves_per_turn = match raw.parse::<i32>() {
                Ok(moves) if moves > 0 => moves,
                Ok(_) => return Err(invalid(MOVES_PER_TURN_ENV_VAR, raw, "must be positive")),
                Err(_) => return Err(invalid(MOVES_PER_TURN_ENV_VAR, raw, "not an integer")),
            };
        }
        if let Some(raw) = read(MAX_TICKS_ENV_VAR) {
            config.max_ticks = match raw.parse::<u32>() {
                Ok(ticks) if ticks > 0 => ticks,
                _ => return Err(invalid(MAX_TICKS_ENV_VAR, raw, "must be a positive integer")),
            };
        }
        if let Some(raw) = read(SAVE_DIR_ENV_VAR) {
            config.save_dir = PathBuf::from(raw);
        }
        Ok(config)
    }

    pub(crate) fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            moves_per_turn: self.moves_per_turn,
        }
    }
}

fn invalid(var: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue { var, value, reason }
}

pub(crate) struct AppWiring {
    pub(crate) config: SimConfig,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Activity Sim Startup ===");

    let config = SimConfig::from_env()?;
    info!(
        moves_per_turn = config.moves_per_turn,
        max_ticks = config.max_ticks,
        save_dir = %config.save_dir.display(),
        registered_activities = ActivityRegistry::builtin().len(),
        "sim_config_loaded"
    );
    Ok(AppWiring { config })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn missing_variables_keep_defaults() {
        let config = SimConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.scheduler(), SchedulerConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = SimConfig::from_lookup(lookup_from(&[
            (MOVES_PER_TURN_ENV_VAR, " 75 "),
            (MAX_TICKS_ENV_VAR, "40"),
            (SAVE_DIR_ENV_VAR, "/tmp/sim-saves"),
        ]))
        .expect("valid config");
        assert_eq!(config.moves_per_turn, 75);
        assert_eq!(config.max_ticks, 40);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/sim-saves"));
        assert_eq!(config.scheduler().moves_per_turn, 75);
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config = SimConfig::from_lookup(lookup_from(&[(SAVE_DIR_ENV_VAR, "   ")]))
            .expect("valid config");
        assert_eq!(config.save_dir, PathBuf::from(DEFAULT_SAVE_DIR));
    }

    #[test]
    fn non_positive_turn_budget_is_rejected() {
        let err = SimConfig::from_lookup(lookup_from(&[(MOVES_PER_TURN_ENV_VAR, "0")]))
            .expect_err("zero budget");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: MOVES_PER_TURN_ENV_VAR,
                value: "0".to_string(),
                reason: "must be positive",
            }
        );
    }

    #[test]
    fn garbage_values_are_rejected() {
        assert!(SimConfig::from_lookup(lookup_from(&[(MOVES_PER_TURN_ENV_VAR, "fast")])).is_err());
        assert!(SimConfig::from_lookup(lookup_from(&[(MAX_TICKS_ENV_VAR, "-3")])).is_err());
    }
}
