//! Contract error types for the settings registry
//!
//! These errors are transport-agnostic and used for inter-module communication.
//! Only boundary conditions are raised as errors; per-item failures travel
//! inside `RegistrationReport` / `RegisterOutcome` instead.

/// Settings registry boundary errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Input was not a recognizable descriptor collection
    InvalidCollection {
        /// What was received instead
        details: String,
    },
    /// The collection contained zero processable descriptors
    NoValidSettings,
    /// Every descriptor in the collection failed
    AllSettingsInvalid {
        /// Keys (or positions) that failed
        failed: Vec<String>,
    },
    /// No namespace available for registration
    MissingNamespace,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCollection { details } => {
                write!(f, "invalid settings collection: {}", details)
            }
            Self::NoValidSettings => {
                write!(f, "no valid settings found")
            }
            Self::AllSettingsInvalid { failed } => {
                write!(f, "all settings are invalid: {}", failed.join(", "))
            }
            Self::MissingNamespace => {
                write!(f, "no namespace supplied and none derivable from the manifest")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
