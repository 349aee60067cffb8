pub mod driver;
pub mod job;
pub mod scenario;
pub mod workload;

pub use driver::{Phase, Sim, Summary};
pub use job::{ProcessSpec, ProcessStats};
pub use scenario::Scenario;
pub use workload::bernoulli_processes;
