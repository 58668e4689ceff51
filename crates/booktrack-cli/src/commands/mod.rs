//! Command handlers

pub mod account;
pub mod book;
pub mod config;
pub mod home;

use booktrack_core::{AccountError, SyncError};

/// Wrap a sync failure so the user-facing message is printed first
pub(crate) fn sync_alert(err: SyncError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Wrap an account failure so the user-facing message is printed first
pub(crate) fn account_alert(err: AccountError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_alert_leads_with_user_message() {
        let err = sync_alert(SyncError::ValidationFailed { field: "genre" });
        assert_eq!(err.to_string(), "Please fill in all fields.");
        assert!(format!("{:#}", err).contains("genre"));
    }

    #[test]
    fn test_account_alert() {
        let err = account_alert(AccountError::UsernameTaken);
        assert_eq!(
            err.to_string(),
            "This username is already taken. Please choose another one."
        );
    }
}
