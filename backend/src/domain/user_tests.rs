//! Tests for the user identity types.

use chrono::Utc;
use rstest::rstest;

use super::*;

#[rstest]
#[case::plain("runner@example.com", "runner@example.com")]
#[case::trimmed("  runner@example.com  ", "runner@example.com")]
#[case::lowercased("Runner@Example.COM", "runner@example.com")]
fn emails_are_canonicalised(#[case] input: &str, #[case] expected: &str) {
    let email = EmailAddress::new(input).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case::empty("", UserValidationError::EmptyEmail)]
#[case::whitespace("   ", UserValidationError::EmptyEmail)]
#[case::no_at("runner.example.com", UserValidationError::InvalidEmail)]
#[case::double_at("runner@@example.com", UserValidationError::InvalidEmail)]
#[case::missing_local("@example.com", UserValidationError::InvalidEmail)]
#[case::missing_domain("runner@", UserValidationError::InvalidEmail)]
fn invalid_emails_are_rejected(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(input), Err(expected));
}

#[rstest]
fn overlong_emails_are_rejected() {
    let local = "a".repeat(EMAIL_MAX);
    let email = format!("{local}@example.com");
    assert_eq!(
        EmailAddress::new(email),
        Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
    );
}

#[rstest]
fn email_at_the_limit_is_accepted() {
    let domain = "example.com";
    let local = "a".repeat(EMAIL_MAX - domain.len() - 1);
    let email = format!("{local}@{domain}");
    assert!(EmailAddress::new(email).is_ok());
}

#[rstest]
fn email_deserialisation_validates() {
    let email: EmailAddress =
        serde_json::from_str("\" Runner@Example.com \"").expect("valid email");
    assert_eq!(email.as_ref(), "runner@example.com");

    let invalid: Result<EmailAddress, _> = serde_json::from_str("\"not-an-email\"");
    assert!(invalid.is_err());
}

#[rstest]
fn display_names_are_trimmed() {
    let name = DisplayName::new("  Runner  ").expect("valid name");
    assert_eq!(name.as_ref(), "Runner");
}

#[rstest]
#[case::empty("", UserValidationError::EmptyDisplayName)]
#[case::whitespace("  \t ", UserValidationError::EmptyDisplayName)]
fn blank_display_names_are_rejected(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(DisplayName::new(input), Err(expected));
}

#[rstest]
fn overlong_display_names_are_rejected() {
    let name = "n".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(name),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
    assert!(DisplayName::new("n".repeat(DISPLAY_NAME_MAX)).is_ok());
}

#[rstest]
fn user_ids_expose_their_value() {
    let id = UserId::new(42);
    assert_eq!(id.value(), 42);
    assert_eq!(id.to_string(), "42");
    assert_eq!(UserId::from(42), id);
}

#[rstest]
fn profiles_drop_the_password_hash() {
    let record = UserRecord {
        id: UserId::new(7),
        email: EmailAddress::new("runner@example.com").expect("valid email"),
        display_name: DisplayName::new("Runner").expect("valid name"),
        password_hash: "argon2-hash".to_owned(),
        created_at: Utc::now(),
    };

    let profile = UserProfile::from(record.clone());
    assert_eq!(profile.id(), record.id);
    assert_eq!(profile.email(), &record.email);
    assert_eq!(profile.display_name(), &record.display_name);

    let value = serde_json::to_value(&profile).expect("serialisable");
    assert!(value.get("passwordHash").is_none());
    assert_eq!(value["email"], "runner@example.com");
}
