//! Transactional email library
//!
//! ## Components
//!
//! - **Email Models**: `Email` message data
//! - **Providers**: SMTP via lettre, and a capturing Mock for tests
//! - **Templates**: Handlebars-based `TemplateEngine` for email templating
//! - **Service**: `EmailService` combining a provider with templates
//!
//! ## Usage
//!
//! ```ignore
//! use email::{EmailService, SmtpProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(SmtpProvider::from_env()?);
//! let service = EmailService::new(provider, "https://app.example.com")?;
//! service.send_activation_email("new.hire@example.com", &token).await?;
//! ```

pub mod models;
pub mod provider;
pub mod service;
pub mod templates;

pub use models::Email;
pub use provider::{EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider};
pub use service::EmailService;
pub use templates::{EmailTemplate, RenderedTemplate, TemplateEngine};
