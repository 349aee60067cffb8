use serde::{Deserialize, Serialize};

use super::{driver::Sim, job::ProcessSpec};
use crate::{error::Result, scheduler::MlfqConfig};

/// A process list together with the scheduler configuration to run it under.
///
/// ```toml
/// [config]
/// reset_period = 50
///
/// [[process]]
/// id = 1
/// arrival_time = 0
/// burst_time = 25
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: MlfqConfig,
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessSpec>,
}

impl Scenario {
    /// Three CPU-bound processes under the default three-level configuration.
    pub fn reference() -> Self {
        Self {
            config: MlfqConfig::default(),
            processes: vec![
                ProcessSpec::new(1, 0, 25),
                ProcessSpec::new(2, 2, 30),
                ProcessSpec::new(3, 5, 15),
            ],
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn into_sim(self) -> Result<Sim> {
        Sim::new(self.processes, self.config)
    }
}
