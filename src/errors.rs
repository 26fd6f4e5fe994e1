use thiserror::Error;

/// The central error type for nevera.
///
/// Only configuration, terminal and server setup failures are fatal. A
/// snippet fetch failure is logged and swallowed by
/// [`crate::snippets::load_snippets`]; it only surfaces through this type
/// when the `fetch` subcommand asks for the raw result.
#[derive(Error, Debug)]
pub enum NeveraError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Server error on {addr}: {message}")]
    Server { addr: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Snippet request timed out")]
    Timeout,

    #[error("Endpoint returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to parse snippet list: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

pub const EXIT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_FETCH_ERROR: u8 = 3;
pub const EXIT_TERMINAL_ERROR: u8 = 4;
pub const EXIT_SERVER_ERROR: u8 = 5;

/// Determine the appropriate process exit code for an error.
pub fn get_exit_code(e: &anyhow::Error) -> u8 {
    if let Some(err) = e.downcast_ref::<NeveraError>() {
        return match err {
            NeveraError::Config(_) => EXIT_CONFIG_ERROR,
            NeveraError::Fetch(_) => EXIT_FETCH_ERROR,
            NeveraError::Terminal(_) => EXIT_TERMINAL_ERROR,
            NeveraError::Server { .. } => EXIT_SERVER_ERROR,
            NeveraError::Other(_) => EXIT_ERROR,
        };
    }

    if e.downcast_ref::<FetchError>().is_some() {
        return EXIT_FETCH_ERROR;
    }

    // Errors wrapped with .context() keep the original as their root cause
    match e.root_cause().downcast_ref::<NeveraError>() {
        Some(NeveraError::Config(_)) => EXIT_CONFIG_ERROR,
        Some(NeveraError::Fetch(_)) => EXIT_FETCH_ERROR,
        Some(NeveraError::Server { .. }) => EXIT_SERVER_ERROR,
        _ if e.root_cause().downcast_ref::<FetchError>().is_some() => EXIT_FETCH_ERROR,
        _ => EXIT_ERROR,
    }
}
