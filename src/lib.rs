pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::SchedEvent;
pub use error::{Result, SimError};
pub use scheduler::{LevelConfig, Mlfq, MlfqConfig, ResetTrigger};
pub use sim::{ProcessSpec, Scenario, Sim};
