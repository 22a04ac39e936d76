//! Authentication routes

pub mod login;
pub mod logout;

use std::sync::Arc;

use sh_core::repositories::{RevocationRepository, StaffDirectory};
use sh_core::services::{AuthService, TokenService};

/// Shared services handed to every handler
pub struct AppState {
    pub auth_service: Arc<AuthService<dyn StaffDirectory, dyn RevocationRepository>>,
    pub token_service: Arc<TokenService<dyn RevocationRepository>>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn StaffDirectory>,
        token_service: Arc<TokenService<dyn RevocationRepository>>,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(directory, token_service.clone())),
            token_service,
        }
    }
}
