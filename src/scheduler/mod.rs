pub mod mlfq;

use serde::{Deserialize, Serialize};

use crate::{
    core::{Level, Ticks},
    error::{Result, SimError},
};
pub use mlfq::Mlfq;

pub const DEFAULT_RESET_PERIOD: Ticks = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub quantum: Ticks,
    // None means unbounded: the level never demotes
    #[serde(default)]
    pub allotment: Option<Ticks>,
}

impl LevelConfig {
    pub const fn new(quantum: Ticks, allotment: Option<Ticks>) -> Self {
        Self { quantum, allotment }
    }
}

/// When a priority reset fires relative to multiples of the reset period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetTrigger {
    /// Only when the clock lands exactly on a multiple after a slice. A slice
    /// that overshoots the boundary skips that reset.
    #[default]
    Exact,
    /// At the first processed instant at or past each new multiple.
    Crossed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlfqConfig {
    /// Highest priority first.
    pub levels: Vec<LevelConfig>,
    pub reset_period: Ticks,
    pub reset_trigger: ResetTrigger,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::new(4, Some(10)),
                LevelConfig::new(8, Some(20)),
                LevelConfig::new(16, None),
            ],
            reset_period: DEFAULT_RESET_PERIOD,
            reset_trigger: ResetTrigger::Exact,
        }
    }
}

impl MlfqConfig {
    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            return Err(invalid("at least one priority level is required".into()));
        }
        if self.reset_period == 0 {
            return Err(invalid("reset period must be positive".into()));
        }

        for (level, cfg) in self.levels.iter().enumerate() {
            if cfg.quantum == 0 {
                return Err(invalid(format!("level {level} has a zero quantum")));
            }
            if cfg.allotment == Some(0) {
                return Err(invalid(format!("level {level} has a zero allotment")));
            }
        }

        Ok(())
    }

    pub fn bottom_level(&self) -> Level {
        self.levels.len().saturating_sub(1)
    }
}

fn invalid(msg: String) -> SimError {
    SimError::InvalidConfiguration(msg)
}

/// What happened to a process after it ran for a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Demoted { from: Level, to: Level },
    Requeued,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejects(config: MlfqConfig) {
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        let config = MlfqConfig::default();
        config.validate().unwrap();
        assert_eq!(config.bottom_level(), 2);
    }

    #[test]
    fn rejects_malformed_configs() {
        rejects(MlfqConfig {
            levels: vec![],
            ..Default::default()
        });
        rejects(MlfqConfig {
            reset_period: 0,
            ..Default::default()
        });
        rejects(MlfqConfig {
            levels: vec![LevelConfig::new(0, None)],
            ..Default::default()
        });
        rejects(MlfqConfig {
            levels: vec![LevelConfig::new(4, None), LevelConfig::new(8, Some(0))],
            ..Default::default()
        });
    }

    #[test]
    fn unbounded_allotment_is_allowed_on_any_level() {
        MlfqConfig {
            levels: vec![LevelConfig::new(4, None), LevelConfig::new(8, Some(20))],
            ..Default::default()
        }
        .validate()
        .unwrap();
        MlfqConfig {
            levels: vec![LevelConfig::new(4, Some(10))],
            ..Default::default()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn config_parses_from_toml() {
        let config: MlfqConfig = toml::from_str(
            r#"
            reset_period = 30
            reset_trigger = "crossed"

            [[levels]]
            quantum = 2

            [[levels]]
            quantum = 5
            allotment = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            config.levels,
            vec![LevelConfig::new(2, None), LevelConfig::new(5, Some(10))]
        );
        assert_eq!(config.reset_period, 30);
        assert_eq!(config.reset_trigger, ResetTrigger::Crossed);
        config.validate().unwrap();
    }
}
