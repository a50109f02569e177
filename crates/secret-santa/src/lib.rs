//! Constrained random Secret Santa draws.
//!
//! Every participant is assigned exactly one other participant to buy a gift
//! for. Nobody draws themselves, and per-santa exclusions are honoured by
//! redrawing until a valid combination turns up or a fixed attempt budget is
//! spent.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading participants, exclusions, and Mailgun credentials from TOML
//! - Random derangement generation with an injectable RNG
//! - Bounded retry against an exclusion set
//! - Rendering the draw as a plain-text table
//! - Emailing each santa through Mailgun
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use secret_santa::{DrawPolicy, Roster, draw};
//!
//! let roster = Roster::from_toml(r#"
//!     [participants]
//!     Alice = "alice@example.com"
//!     Bob = "bob@example.com"
//!     Carol = "carol@example.com"
//!
//!     [exclusions]
//!     Alice = "Bob"
//! "#).expect("valid roster");
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(2026);
//! let accepted = draw(
//!     roster.participants(),
//!     roster.exclusions(),
//!     DrawPolicy::default(),
//!     &mut rng,
//! )
//! .expect("draw succeeds");
//!
//! assert_eq!(accepted.batch().len(), 3);
//! ```

pub mod cli;
mod config;
mod derangement;
mod draw;
mod error;
mod exclusions;
mod notify;
mod participant;
mod table;

pub use config::Roster;
pub use derangement::{MIN_PARTICIPANTS, derange};
pub use draw::{DEFAULT_MAX_ATTEMPTS, Draw, DrawPolicy, draw};
pub use error::{ConfigError, DrawError, NotifyError};
pub use exclusions::ExclusionSet;
pub use notify::{
    MAILGUN_API_BASE, MailgunCredentials, MailgunNotifier, Message, Notifier, compose_message,
    notify_all,
};
pub use participant::{Assignment, AssignmentBatch, Participant, dedup_participants};
pub use table::{RECIPIENT_HEADER, SANTA_HEADER, render_table};
