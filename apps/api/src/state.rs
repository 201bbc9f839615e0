use std::sync::Arc;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::store::JobStore;
use crate::verification::store::CodeStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The job store, verification-code cache, and mail transport are carried as
/// trait objects so handlers never touch ambient clients and tests can swap
/// in-memory doubles for Postgres, Redis, and SMTP.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobStore>,
    pub codes: Arc<dyn CodeStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
