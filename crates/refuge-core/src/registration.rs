//! Account registration form.

use crate::error::{Error, Result};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Fields submitted when creating an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Check the form. Rules apply in order; the first failure is reported.
    pub fn validate(&self) -> Result<()> {
        let fields = [&self.name, &self.email, &self.password, &self.confirm_password];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid("all fields are required"));
        }
        if self.password != self.confirm_password {
            return Err(invalid("passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("password must be at least 6 characters"));
        }
        if !is_email(&self.email) {
            return Err(invalid("e-mail address is not valid"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> Error {
    Error::InvalidRegistration(reason.to_string())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
