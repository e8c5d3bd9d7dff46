use thiserror::Error;

/// obslocate error types
///
/// "Not found" outcomes are not errors: strategies return `Ok(None)` for them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No eligible network interface with an IPv4 address")]
    NoAddressFound,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("Window system error: {0}")]
    WindowSystem(String),

    #[error("Network interface error: {0}")]
    Network(String),

    #[error("Invalid settings file: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
