//! Ticket number generation.
//!
//! Format: `TCK-<last six digits of the epoch millis>-<four alphanumerics>`,
//! e.g. `TCK-482913-aZ4q`. Uniqueness is enforced by the
//! `uq_tickets_ticket_number` constraint, not here.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::types::Timestamp;

pub const TICKET_PREFIX: &str = "TCK";
const SUFFIX_LEN: usize = 4;

pub fn format_ticket_number(prefix: &str, epoch_millis: i64, suffix: &str) -> String {
    let digits = epoch_millis.rem_euclid(1_000_000);
    format!("{prefix}-{digits:06}-{suffix}")
}

pub fn generate_ticket_number(now: Timestamp) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    format_ticket_number(TICKET_PREFIX, now.timestamp_millis(), &suffix)
}
