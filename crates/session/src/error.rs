use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Credential storage error: {0}")]
    Storage(String),
}
