//! Staff directory consulted at login.

use async_trait::async_trait;

use crate::domain::entities::StaffAccount;
use crate::errors::DomainError;

/// Resolves login credentials to a staff account
///
/// Implementations must not reveal whether the username or the password was
/// wrong: both cases return `Ok(None)`.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Check a username/password pair
    ///
    /// # Returns
    /// * `Ok(Some(StaffAccount))` - Credentials are valid
    /// * `Ok(None)` - Unknown user or wrong password
    /// * `Err(DomainError)` - The directory could not be consulted
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<StaffAccount>, DomainError>;
}
