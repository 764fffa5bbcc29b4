//! Ticket code generation.

use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};

/// Prefix of every ticket code.
pub const TICKET_CODE_PREFIX: &str = "TICKET";

/// Build a human-readable ticket code: `TICKET-{unix_millis}-{8 hex}`.
///
/// The random suffix comes from the OS RNG; uniqueness is still enforced by
/// the `tickets.code` constraint.
#[must_use]
pub fn generate_ticket_code(now: Timestamp) -> String {
    format!(
        "{TICKET_CODE_PREFIX}-{}-{:08X}",
        now.as_millisecond(),
        OsRng.next_u32()
    )
}
