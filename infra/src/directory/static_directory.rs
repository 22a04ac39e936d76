//! Staff directory seeded from configuration with bcrypt password hashes

use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, error};

use sh_core::domain::entities::{Role, StaffAccount};
use sh_core::errors::DomainError;
use sh_core::repositories::StaffDirectory;
use sh_shared::config::AccountConfig;

use crate::InfrastructureError;

struct Entry {
    password_hash: String,
    account: StaffAccount,
}

/// In-process staff directory
pub struct StaticStaffDirectory {
    entries: HashMap<String, Entry>,
    /// Hash verified for unknown usernames so both paths cost the same
    decoy_hash: Option<String>,
}

impl StaticStaffDirectory {
    /// Build the directory from configured accounts
    ///
    /// # Returns
    /// * `Err(InfrastructureError::Config)` - Unknown role, malformed hash,
    ///   empty subject or duplicate username
    pub fn from_accounts(accounts: &[AccountConfig]) -> Result<Self, InfrastructureError> {
        let mut entries = HashMap::with_capacity(accounts.len());

        for account in accounts {
            let role = Role::from_str(&account.role).map_err(|e| {
                InfrastructureError::Config(format!("account '{}': {}", account.username, e))
            })?;

            if account.subject_id.trim().is_empty() {
                return Err(InfrastructureError::Config(format!(
                    "account '{}': subject_id must not be empty",
                    account.username
                )));
            }

            if !is_bcrypt_hash(&account.password_hash) {
                return Err(InfrastructureError::Config(format!(
                    "account '{}': password_hash is not a bcrypt hash",
                    account.username
                )));
            }

            let entry = Entry {
                password_hash: account.password_hash.clone(),
                account: StaffAccount {
                    subject_id: account.subject_id.clone(),
                    role,
                },
            };

            if entries.insert(account.username.clone(), entry).is_some() {
                return Err(InfrastructureError::Config(format!(
                    "duplicate account '{}'",
                    account.username
                )));
            }
        }

        let decoy_hash = accounts.first().map(|a| a.password_hash.clone());

        Ok(Self {
            entries,
            decoy_hash,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// bcrypt is CPU bound, keep it off the async workers
    async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("password verification task failed: {}", e),
            })?
            .map_err(|e| {
                error!(error = %e, "Password hash verification failed");
                DomainError::Internal {
                    message: format!("password verification failed: {}", e),
                }
            })
    }
}

/// Shape check for `$2a$`, `$2b$`, `$2x$` and `$2y$` hashes
fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60
        && ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| value.starts_with(prefix))
}

#[async_trait]
impl StaffDirectory for StaticStaffDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<StaffAccount>, DomainError> {
        match self.entries.get(username) {
            Some(entry) => {
                if Self::verify_password(password, &entry.password_hash).await? {
                    Ok(Some(entry.account.clone()))
                } else {
                    debug!(username = %username, "Password mismatch");
                    Ok(None)
                }
            }
            None => {
                if let Some(decoy) = &self.decoy_hash {
                    let _ = Self::verify_password(password, decoy).await?;
                }
                debug!(username = %username, "Unknown username");
                Ok(None)
            }
        }
    }
}
