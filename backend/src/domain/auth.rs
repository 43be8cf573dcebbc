//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Minimum allowed password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The email failed identity validation.
    Email(UserValidationError),
    /// The display name failed identity validation.
    DisplayName(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than the registration policy allows.
    PasswordTooShort { min: usize },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::DisplayName(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` is canonicalised the same way as the stored account key.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("Runner@Example.com", "hunter2hunter2").unwrap();
/// assert_eq!(creds.email().as_ref(), "runner@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Canonical email suitable for account lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// Applies the stricter password policy that only new accounts face, so an
/// existing account with a shorter password can still log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    display_name: DisplayName,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration payload from raw string inputs.
    pub fn try_from_parts(
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        let display_name =
            DisplayName::new(display_name).map_err(AuthValidationError::DisplayName)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            email,
            display_name,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Canonical email that becomes the account key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name for the new account.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
