//! Staff Domain
//!
//! Complete domain implementation for staff management:
//!
//! - Registration with email activation (PENDING until the hire sets a password)
//! - Login, refresh-token rotation and stateless logout
//! - Role-based access control (MD, HR, WORKER) with derived permissions
//! - User CRUD with modification and role-assignment rules
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (auth, users, email)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, tokens, password hashing, policy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory + Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_staff::{
//!     handlers,
//!     repository::InMemoryStaffRepository,
//!     service::StaffService,
//!     token::TokenIssuer,
//! };
//! use email::{EmailService, MockSmtpProvider};
//! use std::sync::Arc;
//!
//! let repository = InMemoryStaffRepository::new();
//! let mailer = Arc::new(
//!     EmailService::new(Arc::new(MockSmtpProvider::new()), "http://localhost:3000").unwrap(),
//! );
//! let service = Arc::new(StaffService::new(
//!     repository,
//!     TokenIssuer::new("secret"),
//!     mailer,
//! ));
//!
//! let router = handlers::auth_router(service.clone())
//!     .merge(handlers::users_router(service));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::{StaffError, StaffResult};
pub use models::{
    ActivateRequest, LoginRequest, MessageResponse, Permission, PermissionName, RefreshRequest,
    RegisterRequest, Role, RoleName, SendEmailRequest, TokenPairResponse, UpdateUserRequest, User,
    UserResponse, UserStatus,
};
pub use postgres::PgStaffRepository;
pub use repository::{InMemoryStaffRepository, StaffRepository};
pub use service::StaffService;
pub use token::TokenIssuer;
