//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::from(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(e) => match e {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::UnsupportedFormat(_) | ApplicationError::Parse { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::Domain(d) => match d {
                        DomainError::UnsupportedOrientation(_)
                        | DomainError::UnknownOrientation(_) => crate::exitcode::USAGE,
                        DomainError::DuplicateId(_) | DomainError::ParentNotFound(_) => {
                            crate::exitcode::DATAERR
                        }
                    },
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identifier, Orientation};
    use std::path::PathBuf;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follows_sysexits() {
        let radial = CliError::from(DomainError::UnsupportedOrientation(Orientation::Radial));
        assert_eq!(radial.exit_code(), crate::exitcode::USAGE);

        let duplicate = CliError::from(DomainError::DuplicateId(Identifier::Int(1)));
        assert_eq!(duplicate.exit_code(), crate::exitcode::DATAERR);

        let format = CliError::from(ApplicationError::UnsupportedFormat(PathBuf::from("t.yaml")));
        assert_eq!(format.exit_code(), crate::exitcode::DATAERR);

        let config = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);

        let io = CliError::from(InfraError::io(
            "write",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(io.exit_code(), crate::exitcode::IOERR);

        assert_eq!(
            CliError::InvalidArgs("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
