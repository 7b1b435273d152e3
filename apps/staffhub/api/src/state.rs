//! Application state management.
//!
//! This module defines the shared application state passed to all request handlers.
//! The state contains:
//! - Configuration
//! - PostgreSQL connection pool
//! - The staff service (business logic over the Postgres repository)

use domain_staff::{PgStaffRepository, StaffService};
use std::sync::Arc;

/// Shared application state.
///
/// This struct is cloned for each handler (inexpensive Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Staff service shared by the auth, users and email routers
    pub staff: Arc<StaffService<PgStaffRepository>>,
}
