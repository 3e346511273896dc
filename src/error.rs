//! Error types and handling for the `Wanderlust` service

use thiserror::Error;

/// Message shown to travelers whenever itinerary generation fails
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate trip plan. Please check your prompt and API key.";

/// Main error type for the `Wanderlust` service
#[derive(Error, Debug)]
pub enum WanderlustError {
    /// Configuration-related errors, including a missing AI credential
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The itinerary service failed or answered with something unusable
    #[error("Generation error: {message}")]
    Generation { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// A requested resource does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Preference store errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WanderlustError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WanderlustError::Config { message } => message.clone(),
            WanderlustError::Generation { .. } => GENERATION_FAILED_MESSAGE.to_string(),
            WanderlustError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WanderlustError::NotFound { message } => message.clone(),
            WanderlustError::Storage { .. } => {
                "Saving your preferences failed. Please try again.".to_string()
            }
            WanderlustError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<fjall::Error> for WanderlustError {
    fn from(err: fjall::Error) -> Self {
        WanderlustError::storage(err.to_string())
    }
}

impl From<postcard::Error> for WanderlustError {
    fn from(err: postcard::Error) -> Self {
        WanderlustError::storage(err.to_string())
    }
}
