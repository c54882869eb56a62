//! Error types for kbv-core
//!
//! Every error's `Display` output is the exact text surfaced to callers after
//! the handler name prefix, so messages here are part of the wire contract.

use thiserror::Error;

/// Top-level error for a single fetch-questions invocation
#[derive(Error, Debug)]
pub enum FetchQuestionsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A required field of the inbound event is absent or malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input event is empty")]
    EmptyEvent,

    #[error("sessionId was not provided")]
    MissingSessionId,

    #[error("Session item was not provided")]
    MissingSessionItem,

    #[error("event parameters not found")]
    MissingParameters,

    #[error("questionsUrl was not provided")]
    MissingQuestionsUrl,

    #[error("userAgent was not provided")]
    MissingUserAgent,

    #[error("bearerToken was not provided")]
    MissingBearerToken,

    #[error("personIdentityItem not found")]
    MissingPersonIdentityItem,

    #[error("nino was not provided")]
    MissingNino,

    #[error(transparent)]
    SessionRecord(#[from] SessionRecordError),
}

/// The nested session record is present but incomplete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionRecordError {
    #[error("Session item was malformed : Session item missing {0}")]
    MissingAttribute(&'static str),

    #[error("Session item was malformed : Session item {0} is not a number")]
    NotANumber(&'static str),

    #[error("Session item was malformed : Session item expiryDate must be a positive epoch time")]
    InvalidExpiry,
}

/// Errors raised by the question-bank collaborator
///
/// Display is the collaborator's own message, without any prefix.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("{0}")]
    Transport(String),

    #[error("Question retrieval failed with status {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Provider(String),
}

/// Errors raised by the saved-questions store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Serialization(String),
}

/// Errors raised by an audit sink
///
/// These never fail an invocation; the handler logs and drops them.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("failed to write audit event: {0}")]
    Write(String),

    #[error("failed to serialize audit event: {0}")]
    Serialize(String),
}
