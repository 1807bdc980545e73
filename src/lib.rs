use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SerializationError: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Resource requirement not found: {0}")]
    ResourceRequirementsNotFound(String),

    #[error("Invalid AlertmanagerConfig: {0}")]
    InvalidAlertmanagerConfig(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn metric_label(&self) -> &'static str {
        match self {
            Error::SerializationError(_) => "SerializationError",
            Error::ResourceRequirementsNotFound(_) => "ResourceRequirementsNotFound",
            Error::InvalidAlertmanagerConfig(_) => "InvalidAlertmanagerConfig",
        }
    }
}

/// Log and trace integrations
pub mod telemetry;

/// External CRDs
pub mod resources;

/// Static resource templates
pub mod templates;

pub mod utils;
