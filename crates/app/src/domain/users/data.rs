//! User Data

use crate::{
    auth::MIN_PASSWORD_LENGTH,
    domain::users::records::{Role, UserUuid},
    validation::Violations,
};

/// New User Data
///
/// `password` is the raw password; it is hashed before storage.
#[derive(Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<u32>,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("uuid", &self.uuid)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl NewUser {
    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the violations for blank names, a malformed email, a short
    /// password or an age above [`MAX_AGE`].
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();

        violations.require_text("first_name", &self.first_name);
        violations.require_text("last_name", &self.last_name);

        if !is_plausible_email(&self.email) {
            violations.push("email", "el email no es válido");
        }

        check_password(&mut violations, &self.password);

        if let Some(age) = self.age {
            check_age(&mut violations, age);
        }

        violations.into_result()
    }
}

/// Admin edit of an account. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub role: Option<Role>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the registration rules to the fields present.
    ///
    /// # Errors
    ///
    /// Returns the violations when nothing would change, a present name is
    /// blank, the email is malformed or the age is out of range.
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();

        if self.is_empty() {
            violations.push(
                "user",
                "debe indicar al menos un campo: first_name, last_name, email, age, role",
            );
        }

        if let Some(first_name) = &self.first_name {
            violations.require_text("first_name", first_name);
        }

        if let Some(last_name) = &self.last_name {
            violations.require_text("last_name", last_name);
        }

        if let Some(email) = &self.email
            && !is_plausible_email(email)
        {
            violations.push("email", "el email no es válido");
        }

        if let Some(age) = self.age {
            check_age(&mut violations, age);
        }

        violations.into_result()
    }
}

/// Oldest accepted age.
pub const MAX_AGE: u32 = 150;

/// Lower-case and trim an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn check_password(violations: &mut Violations, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(
            "password",
            format!("la contraseña debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"),
        );
    }
}

fn check_age(violations: &mut Violations, age: u32) {
    if age > MAX_AGE {
        violations.push("age", format!("la edad debe estar entre 0 y {MAX_AGE}"));
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();

    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}
