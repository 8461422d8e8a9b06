//! Application state shared by every handler

use poet_core::Config;
use poet_storage::UploadStorageManager;
use std::sync::Arc;

use crate::auth::JwtService;
use crate::repository::UploadRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub uploads: UploadStorageManager,
    pub repository: Arc<dyn UploadRepository>,
    /// `None` when no JWT secret is configured; every caller is then anonymous.
    pub jwt: Option<JwtService>,
    /// Error bodies carry diagnostic `details`; off in production.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(
        config: Config,
        uploads: UploadStorageManager,
        repository: Arc<dyn UploadRepository>,
    ) -> Self {
        let jwt = config.jwt_secret().map(JwtService::new);
        let expose_error_details = !config.is_production();
        Self {
            config,
            uploads,
            repository,
            jwt,
            expose_error_details,
        }
    }
}
