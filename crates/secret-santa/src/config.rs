//! Roster configuration loaded from TOML.
//!
//! A configuration file lists the participants in order, optional exclusions
//! keyed by santa name, and optional Mailgun credentials:
//!
//! ```toml
//! [participants]
//! Alice = "alice@example.com"
//! Bob = "bob@example.com"
//! Carol = ""
//!
//! [exclusions]
//! Alice = "Bob, Carol"
//! Bob = ["Alice"]
//!
//! [mailgun]
//! domain = "mg.example.com"
//! api_key = "key-0123"
//! ```
//!
//! An empty address means the participant has no contact address. Every name
//! referenced under `[exclusions]` must be a participant; unresolved names are
//! reported here, before any draw.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::exclusions::ExclusionSet;
use crate::notify::MailgunCredentials;
use crate::participant::Participant;

const PARTICIPANTS_SECTION: &str = "participants";

/// Participants, exclusions, and credentials for one run.
///
/// # Example
///
/// ```
/// use secret_santa::Roster;
///
/// let roster = Roster::from_toml(r#"
///     [participants]
///     Alice = "alice@example.com"
///     Bob = "bob@example.com"
///
///     [exclusions]
///     Alice = "Bob"
/// "#).expect("valid roster");
///
/// assert_eq!(roster.participants().len(), 2);
/// assert!(roster.mailgun().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    exclusions: ExclusionSet,
    mailgun: Option<MailgunCredentials>,
}

impl Roster {
    /// Parses a roster from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - The TOML is malformed or a section has the wrong shape
    /// - The `[participants]` section is missing
    /// - A participant name is blank or an address is not a string
    /// - An exclusion names an unknown participant
    /// - A Mailgun credential is blank
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawRoster = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.message().to_owned(),
        })?;

        Self::from_raw(raw)
    }

    /// Loads a roster from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_toml(&contents)
    }

    fn from_raw(raw: RawRoster) -> Result<Self, ConfigError> {
        let table = raw.participants.ok_or(ConfigError::MissingSection {
            section: PARTICIPANTS_SECTION,
        })?;
        let participants = table
            .into_iter()
            .map(|(name, address)| parse_participant(&name, &address))
            .collect::<Result<Vec<_>, _>>()?;

        let exclusions = resolve_exclusions(&participants, raw.exclusions)?;

        let mailgun = raw.mailgun.map(RawMailgun::into_credentials).transpose()?;

        Ok(Self {
            participants,
            exclusions,
            mailgun,
        })
    }

    /// Returns the participants in file order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns the resolved exclusions.
    #[must_use]
    pub const fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Returns the Mailgun credentials, if configured.
    #[must_use]
    pub const fn mailgun(&self) -> Option<&MailgunCredentials> {
        self.mailgun.as_ref()
    }

    /// Returns the participants that have no contact address.
    pub fn unaddressed(&self) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(|participant| participant.address().is_none())
    }

    /// Finds a participant by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name() == name)
    }
}

fn parse_participant(raw_name: &str, raw_address: &toml::Value) -> Result<Participant, ConfigError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(ConfigError::BlankParticipantName);
    }
    let address = raw_address
        .as_str()
        .ok_or_else(|| ConfigError::InvalidAddress {
            name: name.to_owned(),
        })?
        .trim();

    Ok(Participant::new(
        name,
        (!address.is_empty()).then(|| address.to_owned()),
    ))
}

fn resolve_exclusions(
    participants: &[Participant],
    raw: BTreeMap<String, RawExclusions>,
) -> Result<ExclusionSet, ConfigError> {
    let by_name: HashMap<&str, &Participant> = participants
        .iter()
        .map(|participant| (participant.name(), participant))
        .collect();
    let lookup = |santa: &str, name: &str| {
        by_name
            .get(name)
            .map(|participant| (*participant).clone())
            .ok_or_else(|| ConfigError::UnknownParticipant {
                santa: santa.to_owned(),
                name: name.to_owned(),
            })
    };

    let mut exclusions = ExclusionSet::new();
    for (raw_santa, forbidden) in raw {
        let santa_name = raw_santa.trim();
        let santa = lookup(santa_name, santa_name)?;
        for name in forbidden.names() {
            exclusions.forbid(santa.clone(), lookup(santa_name, &name)?);
        }
    }
    Ok(exclusions)
}

/// Raw TOML representation for deserialization.
#[derive(Debug, Deserialize)]
struct RawRoster {
    participants: Option<toml::Table>,
    #[serde(default)]
    exclusions: BTreeMap<String, RawExclusions>,
    mailgun: Option<RawMailgun>,
}

/// Forbidden recipients as a comma-separated string or an array of names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExclusions {
    Csv(String),
    Names(Vec<String>),
}

impl RawExclusions {
    fn names(self) -> Vec<String> {
        let names = match self {
            Self::Csv(list) => list.split(',').map(str::to_owned).collect(),
            Self::Names(list) => list,
        };
        names
            .into_iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Raw TOML representation of the `[mailgun]` section.
#[derive(Debug, Deserialize)]
struct RawMailgun {
    domain: String,
    api_key: String,
}

impl RawMailgun {
    fn into_credentials(self) -> Result<MailgunCredentials, ConfigError> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::BlankCredential { field: "domain" });
        }
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::BlankCredential { field: "api_key" });
        }
        Ok(MailgunCredentials::new(domain, api_key))
    }
}
