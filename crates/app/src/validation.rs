//! Field-level validation failures collected across a whole payload.

use std::fmt;

use smallvec::SmallVec;

/// Largest count an `INTEGER` column holds.
pub const MAX_COUNT: u32 = i32::MAX.unsigned_abs();

/// Largest amount in minor units a `BIGINT` column holds.
pub const MAX_AMOUNT: u64 = i64::MAX.unsigned_abs();

/// A single rejected field with a client-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one payload. Validation never stops at the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(SmallVec<[Violation; 4]>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(Violation::new(field, message));
    }

    /// Record a violation when `value` is blank.
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{field} es obligatorio"));
        }
    }

    /// Record a violation when `count` exceeds [`MAX_COUNT`].
    pub fn check_count(&mut self, field: &str, count: u32) {
        if count > MAX_COUNT {
            self.push(field, format!("{field} no puede superar {MAX_COUNT}"));
        }
    }

    /// Record a violation when `amount` exceeds [`MAX_AMOUNT`].
    pub fn check_amount(&mut self, field: &str, amount: u64) {
        if amount > MAX_AMOUNT {
            self.push(field, format!("{field} no puede superar {MAX_AMOUNT}"));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected set.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{violation}")?;
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_violation() {
        let mut violations = Violations::new();

        violations.require_text("title", "");
        violations.require_text("code", "  ");
        violations.require_text("category", "tools");

        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations.to_string(),
            "title: title es obligatorio; code: code es obligatorio"
        );
    }

    #[test]
    fn empty_set_is_ok() {
        assert!(Violations::new().into_result().is_ok());
    }
}
