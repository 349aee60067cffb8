use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid process spec for P{id}: {reason}")]
    InvalidProcessSpec { id: i64, reason: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("malformed scenario: {0}")]
    Scenario(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
