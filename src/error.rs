use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prescaler selector {0} out of range (0-7)")]
    InvalidSelector(u8),

    #[error("Signal input error: {0}")]
    SignalInput(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MeterError>;
