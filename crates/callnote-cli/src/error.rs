use anyhow::Error;
use callnote_config::ConfigError;
use callnote_core::{CoreError, FailureKind};
use callnote_store::{StoreError, StoreErrorKind};
use callnote_sync::SyncError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("call summary rejected ({kind}): {detail}")]
    Rejected { kind: FailureKind, detail: String },
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn rejected(kind: FailureKind, detail: impl Into<String>) -> Error {
    CliError::Rejected {
        kind,
        detail: detail.into(),
    }
    .into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::Rejected { kind, .. } => outcome_exit_code(*kind),
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(sync_err) = cause.downcast_ref::<SyncError>() {
            return ExitCode::from(sync_exit_code(sync_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(_json_err) = cause.downcast_ref::<serde_json::Error>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

pub fn outcome_exit_code(kind: FailureKind) -> u8 {
    match kind {
        FailureKind::InvalidSummary => EXIT_INVALID_INPUT,
        FailureKind::CaregiverNotFound => EXIT_NOT_FOUND,
        FailureKind::UpdateFailed | FailureKind::VerificationFailed => EXIT_FAILURE,
    }
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidDataPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidTimeout(_)
        | ConfigError::InvalidBind(_)
        | ConfigError::InvalidBaseUrl(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::NotFound(_) => EXIT_NOT_FOUND,
        SyncError::Parse(_) | SyncError::Unavailable(_) => EXIT_INVALID_INPUT,
        SyncError::Status { .. } => EXIT_FAILURE,
        #[cfg(feature = "axiscare-http")]
        SyncError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "axiscare-http")]
        SyncError::Url(_) => EXIT_INVALID_INPUT,
    }
}
