use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::{AlleleRequest, AlleleResponse, ErrorBody};

/// Failure of a single call against a GA4GH backend.
#[derive(Debug, Error, Diagnostic)]
pub enum Ga4ghError {
    #[error("GA4GH request failed: {0}")]
    Http(String),

    #[error("GA4GH server returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid GA4GH base url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

#[derive(Debug, Error, Diagnostic)]
pub enum BeaconError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("{context}")]
    BackendCommunication {
        context: String,
        #[source]
        source: Ga4ghError,
    },

    #[error("missing beacon descriptor at {0}")]
    MissingConfig(PathBuf),

    #[error("failed to read beacon descriptor at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse beacon descriptor: {0}")]
    ConfigParse(String),

    #[error("invalid beacon descriptor: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Generic(String),
}

impl BeaconError {
    pub fn backend(context: impl Into<String>, source: Ga4ghError) -> Self {
        BeaconError::BackendCommunication {
            context: context.into(),
            source,
        }
    }

    pub fn reason(&self) -> Reason {
        match self {
            BeaconError::InvalidRequest(_) => Reason::InvalidRequest,
            BeaconError::UnknownDataset(_) => Reason::UnknownDataset,
            BeaconError::BackendCommunication { .. } => Reason::ConnectionError,
            BeaconError::MissingConfig(_)
            | BeaconError::ConfigRead(_)
            | BeaconError::ConfigParse(_)
            | BeaconError::InvalidConfig(_)
            | BeaconError::Generic(_) => Reason::Error,
        }
    }
}

/// Coarse classification of a [`BeaconError`], matched at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    InvalidRequest,
    UnknownDataset,
    ConnectionError,
    Error,
}

impl Reason {
    pub fn error_code(&self) -> u16 {
        match self {
            Reason::InvalidRequest | Reason::UnknownDataset => 400,
            Reason::ConnectionError | Reason::Error => 500,
        }
    }
}

/// Error returned by an allele query, with the originating request attached
/// when the failure happened during evaluation.
#[derive(Debug, Error, Diagnostic)]
#[error("{error}")]
pub struct AlleleRequestError {
    pub error: BeaconError,
    pub request: Option<AlleleRequest>,
}

impl AlleleRequestError {
    pub fn new(error: BeaconError) -> Self {
        Self {
            error,
            request: None,
        }
    }

    pub fn with_request(error: BeaconError, request: AlleleRequest) -> Self {
        Self {
            error,
            request: Some(request),
        }
    }

    pub fn reason(&self) -> Reason {
        self.error.reason()
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            error_code: self.reason().error_code(),
            message: Some(self.error.to_string()),
        }
    }

    /// Folds the error into an allele response carrying no existence answer.
    pub fn into_response(self, beacon_id: &str) -> AlleleResponse {
        let error = self.to_error_body();
        AlleleResponse {
            beacon_id: beacon_id.to_string(),
            exists: None,
            error: Some(error),
            allele_request: self.request,
            dataset_allele_responses: None,
        }
    }
}

impl From<BeaconError> for AlleleRequestError {
    fn from(error: BeaconError) -> Self {
        Self::new(error)
    }
}
