//! Declarative agent configuration files
//!
//! Two document shapes are read:
//!
//! ```text
//! <bank identifier='bank1'>
//!   <parameter name='r' value='0.02'></parameter>
//! </bank>
//!
//! <transactions>
//!   <transaction type='deposits' asset='' from='bank1' to='household1'
//!                amount='30' interest='0.02' maturity='0'
//!                time_of_default='-1'></transaction>
//! </transactions>
//! ```
//!
//! A file is accepted or rejected as a whole. Rejections are logged and
//! returned as a [`ConfigError`] that tells a missing file apart from a
//! malformed one.

pub mod document;

pub use document::{
    parse_parameter_document, parse_transaction_document, DocumentError, ParameterDocument,
};

use crate::environment::EnvironmentError;
use crate::models::agent::AgentError;
use crate::models::transaction::TransactionSpec;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{} could not be read: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{} could not be parsed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: DocumentError,
    },

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// Result of a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Number of `<parameter>` or `<transaction>` elements applied
    pub entries: usize,
}

/// Read and parse a parameter file
pub fn read_parameter_file(path: &Path) -> Result<ParameterDocument, ConfigError> {
    let result = read_text(path).and_then(|text| {
        parse_parameter_document(&text).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    });
    report(path, result)
}

/// Read and parse a transaction file
pub fn read_transaction_file(path: &Path) -> Result<Vec<TransactionSpec>, ConfigError> {
    let result = read_text(path).and_then(|text| {
        parse_transaction_document(&text).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    });
    report(path, result)
}

/// Report a rejected file on the diagnostic channel
pub(crate) fn log_failure(path: &Path, err: &ConfigError) {
    tracing::error!(path = %path.display(), error = %err, "configuration file could not be parsed");
}

fn report<T>(path: &Path, result: Result<T, ConfigError>) -> Result<T, ConfigError> {
    if let Err(err) = &result {
        log_failure(path, err);
    }
    result
}

fn read_text(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xml");

        let err = read_parameter_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<bank identifier='bank1'>").unwrap();

        let err = read_parameter_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("could not be parsed"));
    }

    #[test]
    fn test_empty_transactions_document_is_zero_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<transactions></transactions>").unwrap();

        let specs = read_transaction_file(file.path()).unwrap();
        assert!(specs.is_empty());
    }
}
