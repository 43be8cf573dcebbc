//! Driving ports for account profile reads and updates.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, Error, UserProfile};

/// Driving port for profile reads.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Public profile for an account, `NotFoundError` when absent.
    async fn profile(&self, email: &EmailAddress) -> Result<UserProfile, Error>;
}

/// Driving port for profile updates.
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Replace the display name on the acting user's account.
    async fn update_display_name(
        &self,
        email: &EmailAddress,
        display_name: DisplayName,
    ) -> Result<UserProfile, Error>;
}
