//! Error types.
//!
//! Two layers:
//!
//! - `PetError` is what the library returns. It separates caller bugs
//!   (`UnknownParameterKey`) from numerical failures (`Regression`) so the
//!   parameter pipeline can convert the latter into a completion message.
//! - `AppError` is what the `pet` binary reports: a message plus a process exit
//!   code.

use crate::domain::EquipType;

/// Library-level failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PetError {
    /// A rated parameter id that the equipment does not declare.
    #[error("unknown rated parameter id `{id}` for {equip:?}")]
    UnknownParameterKey { equip: EquipType, id: String },

    /// The least-squares solver could not produce a trustworthy answer.
    #[error("regression failed: {0}")]
    Regression(String),

    /// Malformed input handed to a library operation (shape mismatches, etc.).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File or parse failures in the job/export helpers.
    #[error("{0}")]
    Io(String),
}

impl PetError {
    /// Exit code used when this error escapes to the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PetError::Io(_) | PetError::InvalidInput(_) | PetError::UnknownParameterKey { .. } => 2,
            PetError::Regression(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PetError> for AppError {
    fn from(err: PetError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pet_error_maps_to_exit_code() {
        let err: AppError = PetError::Regression("singular".into()).into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "regression failed: singular");

        let err: AppError = PetError::Io("missing file".into()).into();
        assert_eq!(err.exit_code(), 2);

        let err: AppError = PetError::UnknownParameterKey {
            equip: EquipType::WahpHeatingCurveFit,
            id: "qc".into(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }
}
