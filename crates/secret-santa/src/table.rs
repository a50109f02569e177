//! Plain-text rendering of an assignment batch.

use crate::participant::AssignmentBatch;

/// Header label for the giver column.
pub const SANTA_HEADER: &str = "Santa";

/// Header label for the receiver column.
pub const RECIPIENT_HEADER: &str = "Recipient";

const COLUMN_GAP: &str = "  ";

/// Renders `batch` as a two-column table.
///
/// Both columns share one width: the longest participant name or header
/// label, whichever is longer. The header is underlined with `=` across its
/// full width. Widths are measured in characters.
///
/// # Example
///
/// ```
/// use secret_santa::{Assignment, AssignmentBatch, Participant, render_table};
///
/// let alice = Participant::new("Alice", None);
/// let bob = Participant::new("Bob", None);
/// let batch = AssignmentBatch::new(vec![
///     Assignment::new(alice.clone(), bob.clone()).expect("distinct"),
///     Assignment::new(bob, alice).expect("distinct"),
/// ]);
///
/// let table = render_table(&batch);
/// let mut lines = table.lines();
/// assert_eq!(lines.next(), Some("Santa      Recipient"));
/// assert_eq!(lines.next(), Some("===================="));
/// assert_eq!(lines.next(), Some("Alice      Bob      "));
/// ```
#[must_use]
pub fn render_table(batch: &AssignmentBatch) -> String {
    let width = column_width(batch);
    let header = row(SANTA_HEADER, RECIPIENT_HEADER, width);
    let underline = "=".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(batch.len() + 2);
    lines.push(header);
    lines.push(underline);
    lines.extend(
        batch
            .iter()
            .map(|pair| row(pair.santa().name(), pair.recipient().name(), width)),
    );

    let mut table = lines.join("\n");
    table.push('\n');
    table
}

fn column_width(batch: &AssignmentBatch) -> usize {
    batch
        .iter()
        .flat_map(|pair| [pair.santa().name(), pair.recipient().name()])
        .chain([SANTA_HEADER, RECIPIENT_HEADER])
        .map(|label| label.chars().count())
        .max()
        .unwrap_or_default()
}

fn row(left: &str, right: &str, width: usize) -> String {
    format!("{left:<width$}{COLUMN_GAP}{right:<width$}")
}
