//! Error types for the secret-santa crate.
//!
//! This module defines semantic error enums for configuration loading, the
//! assignment draw, and notification delivery, following the project's error
//! handling conventions with `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating a configuration file.
///
/// All of these are reported before any draw is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file at '{path}': {message}")]
    IoError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A required section is absent.
    #[error("configuration is missing the [{section}] section")]
    MissingSection {
        /// Name of the missing section.
        section: &'static str,
    },

    /// A participant entry has a blank name.
    #[error("participant names must not be blank")]
    BlankParticipantName,

    /// A participant's address is not a string.
    #[error("address for participant '{name}' must be a string")]
    InvalidAddress {
        /// Participant whose address is malformed.
        name: String,
    },

    /// An exclusion entry names someone who is not a participant.
    #[error("exclusion for '{santa}' references unknown participant '{name}'")]
    UnknownParticipant {
        /// Santa whose exclusion entry holds the reference.
        santa: String,
        /// The name that could not be resolved.
        name: String,
    },

    /// A notification credential is present but blank.
    #[error("mailgun {field} must not be blank")]
    BlankCredential {
        /// The blank credential field.
        field: &'static str,
    },
}

/// Errors that can occur while drawing assignments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Fewer than two unique participants were supplied.
    #[error("at least 2 participants are required, found {count}")]
    TooFewParticipants {
        /// Number of unique participants supplied.
        count: usize,
    },

    /// A participant was paired with themselves.
    #[error("participant '{name}' cannot be their own santa")]
    SelfAssignment {
        /// Participant named on both sides of the pair.
        name: String,
    },

    /// The generator ran out of recipients for a santa.
    #[error("no eligible recipient remained for '{santa}'")]
    NoCandidate {
        /// Santa left without a recipient.
        santa: String,
    },

    /// Every attempt in the retry budget was rejected by the exclusions.
    #[error("no valid combination found after {attempts} attempts")]
    NoValidCombination {
        /// Number of attempts made before giving up.
        attempts: usize,
    },
}

/// Errors that can occur when delivering a notification.
///
/// A failure stops delivery of the remaining notifications; messages already
/// sent are not recalled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The santa has no contact address to notify.
    #[error("participant '{santa}' has no contact address")]
    MissingAddress {
        /// Santa without an address.
        santa: String,
    },

    /// The provider endpoint could not be built.
    #[error("invalid notification endpoint: {message}")]
    InvalidEndpoint {
        /// Description of the URL error.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Description of the client error.
        message: String,
    },

    /// The request failed before a response arrived.
    #[error("failed to notify '{santa}': {message}")]
    Transport {
        /// Santa whose notification failed.
        santa: String,
        /// Description of the transport error.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("provider rejected notification for '{santa}': status {status}{body}")]
    Rejected {
        /// Santa whose notification was rejected.
        santa: String,
        /// HTTP status code returned by the provider.
        status: u16,
        /// Response body preview, prefixed with `": "` when non-empty.
        body: String,
    },
}
