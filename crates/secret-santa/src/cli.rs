//! Command-line flow for the `secret-santa` binary.
//!
//! The binary parses [`Options`] and delegates to [`run`], so the whole flow
//! can be exercised in tests without spawning a process.

use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;

use crate::config::Roster;
use crate::draw::{DrawPolicy, draw};
use crate::error::{ConfigError, DrawError, NotifyError};
use crate::notify::{MailgunCredentials, MailgunNotifier, Notifier, notify_all};
use crate::participant::AssignmentBatch;
use crate::table::render_table;

/// `secret-santa` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "secret-santa",
    about = "Draw Secret Santa assignments and optionally email each santa",
    long_about = "Draw Secret Santa assignments from a TOML roster.\n\n\
        Every participant gives to exactly one other participant and nobody \
        draws themselves. Exclusions in the roster are honoured by redrawing \
        until a valid combination is found or the attempt budget runs out.",
    version
)]
pub struct Options {
    /// Path to the TOML roster.
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Do not print the assignment table.
    #[arg(short, long)]
    quiet: bool,
    /// Email every santa their recipient through Mailgun.
    #[arg(short, long)]
    send: bool,
    /// Seed for a reproducible draw.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Attempts before giving up on the exclusions [default: 1000].
    #[arg(long, value_name = "N")]
    max_attempts: Option<NonZeroUsize>,
    /// Mailgun sending domain, overriding the roster.
    #[arg(long, value_name = "DOMAIN", env = "SECRET_SANTA_MAILGUN_DOMAIN")]
    mailgun_domain: Option<String>,
    /// Mailgun API key, overriding the roster.
    #[arg(
        long,
        value_name = "KEY",
        env = "SECRET_SANTA_MAILGUN_API_KEY",
        hide_env_values = true
    )]
    mailgun_api_key: Option<String>,
}

impl Options {
    /// Returns the roster path.
    #[must_use]
    pub fn config(&self) -> &Path {
        &self.config
    }

    /// Returns `true` when notifications should be sent.
    #[must_use]
    pub const fn send(&self) -> bool {
        self.send
    }

    /// Returns the retry policy selected on the command line.
    #[must_use]
    pub fn policy(&self) -> DrawPolicy {
        self.max_attempts
            .map_or_else(DrawPolicy::default, DrawPolicy::new)
    }

    /// Resolves Mailgun credentials, letting flags override the roster.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingCredentials`] when no domain or API key is
    /// available.
    pub fn credentials(&self, roster: &Roster) -> Result<MailgunCredentials, CliError> {
        let from_roster = roster.mailgun();
        let domain = non_blank(self.mailgun_domain.as_deref())
            .or_else(|| from_roster.map(MailgunCredentials::domain))
            .ok_or(CliError::MissingCredentials)?;
        let api_key = non_blank(self.mailgun_api_key.as_deref())
            .or_else(|| from_roster.map(MailgunCredentials::api_key))
            .ok_or(CliError::MissingCredentials)?;
        Ok(MailgunCredentials::new(domain, api_key))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The accepted batch.
    pub batch: AssignmentBatch,
    /// Attempts the draw needed.
    pub attempts: usize,
    /// Number of santas notified.
    pub notified: usize,
}

/// Loads the roster, draws, prints, and notifies as `options` request.
///
/// Credentials are checked before the draw when sending is requested.
///
/// # Errors
///
/// Returns [`CliError`] when the roster is invalid, the draw is infeasible,
/// output cannot be written, or a notification fails.
pub fn run<W>(options: &Options, out: &mut W) -> Result<Summary, CliError>
where
    W: Write + ?Sized,
{
    let roster = Roster::from_file(options.config())?;
    info!(
        path = %options.config().display(),
        participants = roster.participants().len(),
        "roster loaded"
    );

    let mailgun = if options.send() {
        Some(MailgunNotifier::new(options.credentials(&roster)?)?)
    } else {
        None
    };
    let notifier = mailgun.as_ref().map(|n| n as &dyn Notifier);

    execute(&roster, options, notifier, out)
}

/// Runs the draw for an already loaded roster.
///
/// When a notifier is supplied every participant must have a contact address.
/// This is checked before the draw, so nobody is emailed if anyone can't be.
///
/// # Errors
///
/// Returns [`CliError`] when a participant cannot be notified, the draw is
/// infeasible, output cannot be written, or a notification fails.
pub fn execute<W>(
    roster: &Roster,
    options: &Options,
    notifier: Option<&dyn Notifier>,
    out: &mut W,
) -> Result<Summary, CliError>
where
    W: Write + ?Sized,
{
    if notifier.is_some() {
        let names: Vec<String> = roster
            .unaddressed()
            .map(|participant| participant.name().to_owned())
            .collect();
        if !names.is_empty() {
            return Err(CliError::MissingAddresses { names });
        }
    }

    let mut rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    let accepted = draw(
        roster.participants(),
        roster.exclusions(),
        options.policy(),
        &mut rng,
    )?;
    let attempts = accepted.attempts();
    let batch = accepted.into_batch();

    if !options.quiet {
        out.write_all(render_table(&batch).as_bytes())
            .map_err(|err| CliError::Output {
                message: err.to_string(),
            })?;
    }

    let notified = match notifier {
        Some(sink) => notify_all(sink, &batch)?,
        None => 0,
    };

    Ok(Summary {
        batch,
        attempts,
        notified,
    })
}

/// Errors surfaced by the command-line flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The roster could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No valid draw was found.
    #[error(transparent)]
    Draw(#[from] DrawError),
    /// A notification could not be delivered.
    #[error(transparent)]
    Notify(#[from] NotifyError),
    /// Sending was requested without Mailgun credentials.
    #[error(
        "--send requires a [mailgun] section or --mailgun-domain and --mailgun-api-key"
    )]
    MissingCredentials,
    /// Sending was requested but some participants have no address.
    #[error(
        "--send requires an address for every participant; missing: {}",
        names.join(", ")
    )]
    MissingAddresses {
        /// Participants without a contact address, in roster order.
        names: Vec<String>,
    },
    /// The table could not be written.
    #[error("failed to write output: {message}")]
    Output {
        /// Description of the write error.
        message: String,
    },
}
