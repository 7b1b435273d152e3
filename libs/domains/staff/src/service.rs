use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use email::EmailService;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{StaffError, StaffResult};
use crate::models::{
    ActivateRequest, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, RoleName,
    SendEmailRequest, TokenPairResponse, UpdateUserRequest, User, UserResponse, UserStatus,
};
use crate::policy;
use crate::repository::StaffRepository;
use crate::token::{ACTIVATION_TOKEN_TTL, TokenIssuer, TokenPurpose};

/// Service layer for staff business logic
#[derive(Clone)]
pub struct StaffService<R: StaffRepository> {
    repository: Arc<R>,
    tokens: TokenIssuer,
    mailer: Arc<EmailService>,
}

impl<R: StaffRepository> StaffService<R> {
    pub fn new(repository: R, tokens: TokenIssuer, mailer: Arc<EmailService>) -> Self {
        Self {
            repository: Arc::new(repository),
            tokens,
            mailer,
        }
    }

    /// Register a new staff member.
    ///
    /// The account starts PENDING with no password; an activation link is
    /// emailed to the new hire. A failed send does not roll the user back,
    /// the account stays PENDING and the failure is logged.
    pub async fn register(&self, actor: &User, input: RegisterRequest) -> StaffResult<UserResponse> {
        let email = input.email.to_lowercase();

        if self.repository.exists_by_email(&email).await? {
            return Err(StaffError::DuplicateEmail(email));
        }

        if !actor.has_role(RoleName::Md) && !actor.has_role(RoleName::Hr) {
            return Err(StaffError::Forbidden(
                "You do not have permission to create staff".to_string(),
            ));
        }

        let role_names = parse_role_names(&input.roles)?;
        for role in &role_names {
            if !policy::can_assign_role(actor, *role) {
                return Err(StaffError::Forbidden(format!(
                    "You do not have permission to assign role {}",
                    role
                )));
            }
        }

        let roles = self.repository.resolve_roles(&role_names).await?;
        if roles.is_empty() {
            return Err(StaffError::InvalidRole(input.roles.join(", ")));
        }

        let mut user = User::new(
            input.first_name,
            input.last_name,
            email,
            roles,
            Some(actor.id),
        );

        let activation_token = self.tokens.create_activation_token(user.id, &user.email)?;
        user.activation_token = Some(activation_token.clone());
        user.activation_token_expires =
            Some(Utc::now() + Duration::seconds(ACTIVATION_TOKEN_TTL));

        let created = self.repository.create(user).await?;

        if let Err(e) = self
            .mailer
            .send_activation_email(&created.email, &activation_token)
            .await
        {
            tracing::error!(
                user_id = %created.id,
                email = %created.email,
                error = %e,
                "Failed to send activation email"
            );
        }

        Ok(created.into())
    }

    /// Activate a PENDING account, setting its password.
    pub async fn activate(&self, input: ActivateRequest) -> StaffResult<UserResponse> {
        self.tokens.verify(&input.token, TokenPurpose::Activation)?;

        let mut user = self
            .repository
            .get_by_activation_token(&input.token)
            .await?
            .ok_or(StaffError::InvalidActivationToken)?;

        if user.status == UserStatus::Active {
            return Err(StaffError::AlreadyActive);
        }

        user.password_hash = Some(self.hash_password(&input.password)?);
        user.status = UserStatus::Active;
        user.activation_token = None;
        user.activation_token_expires = None;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;

        tracing::info!(user_id = %updated.id, "Account activated");
        Ok(updated.into())
    }

    /// Verify credentials and issue an access/refresh pair.
    pub async fn login(&self, input: LoginRequest) -> StaffResult<TokenPairResponse> {
        let mut user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(StaffError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .clone()
            .ok_or(StaffError::InvalidCredentials)?;
        if !self.verify_password(&input.password, &hash)? {
            return Err(StaffError::InvalidCredentials);
        }

        if user.status != UserStatus::Active {
            return Err(StaffError::NotActive);
        }

        let pair = self.issue_pair(&mut user).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    /// Rotate a refresh token into a fresh access/refresh pair.
    ///
    /// The presented token must match the stored digest; rotation makes any
    /// previously issued refresh token unusable.
    pub async fn refresh(&self, input: RefreshRequest) -> StaffResult<TokenPairResponse> {
        let claims = self
            .tokens
            .verify(&input.refresh_token, TokenPurpose::Refresh)
            .map_err(|_| StaffError::InvalidRefreshToken)?;

        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| StaffError::InvalidRefreshToken)?;

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(StaffError::InvalidRefreshToken)?;

        let stored = user
            .refresh_token_digest
            .clone()
            .ok_or(StaffError::InvalidRefreshToken)?;
        if stored != refresh_digest(&input.refresh_token) {
            return Err(StaffError::InvalidRefreshToken);
        }

        let pair = self.issue_pair(&mut user).await?;

        tracing::info!(user_id = %user.id, "Refresh token rotated");
        Ok(pair)
    }

    /// Stateless logout acknowledgement.
    ///
    /// Tokens are not revoked server-side; access tokens expire on their own
    /// and refresh tokens die by expiry or rotation.
    pub fn logout(&self, actor: &User) -> MessageResponse {
        tracing::info!(user_id = %actor.id, "User logged out");
        MessageResponse {
            message: "Logout successful.".to_string(),
        }
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> StaffResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(StaffError::NotFound(id))?;

        Ok(user.into())
    }

    /// List all users, newest first
    pub async fn list_users(&self) -> StaffResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Update a user, enforcing modification and role-assignment rules.
    pub async fn update_user(
        &self,
        actor: &User,
        id: Uuid,
        input: UpdateUserRequest,
    ) -> StaffResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(StaffError::NotFound(id))?;

        if !policy::can_modify(actor, &user) {
            return Err(StaffError::Forbidden(
                "You do not have permission to modify this user".to_string(),
            ));
        }

        if let Some(ref new_email) = input.email {
            let new_email = new_email.to_lowercase();
            if new_email != user.email && self.repository.exists_by_email(&new_email).await? {
                return Err(StaffError::DuplicateEmail(new_email));
            }
            user.email = new_email;
        }

        if let Some(ref role_strings) = input.roles {
            let role_names = parse_role_names(role_strings)?;
            for role in &role_names {
                if !policy::can_assign_role(actor, *role) {
                    return Err(StaffError::Forbidden(format!(
                        "You do not have permission to assign role {}",
                        role
                    )));
                }
            }

            let roles = self.repository.resolve_roles(&role_names).await?;
            if roles.is_empty() {
                return Err(StaffError::InvalidRole(role_strings.join(", ")));
            }
            user.roles = roles;
        }

        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user. Self-deletion is rejected even for MDs.
    pub async fn remove_user(&self, actor: &User, id: Uuid) -> StaffResult<()> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(StaffError::NotFound(id))?;

        if !policy::can_modify(actor, &user) {
            return Err(StaffError::Forbidden(
                "You do not have permission to delete this user".to_string(),
            ));
        }

        if actor.id == id {
            return Err(StaffError::SelfDeletion);
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(StaffError::NotFound(id));
        }

        Ok(())
    }

    /// Send an ad-hoc email through the configured provider.
    pub async fn send_email(&self, input: SendEmailRequest) -> StaffResult<MessageResponse> {
        self.mailer
            .send_email(input.recipients, &input.subject, input.text, input.html)
            .await
            .map_err(|e| StaffError::EmailDelivery(e.to_string()))?;

        Ok(MessageResponse {
            message: "Email sent successfully".to_string(),
        })
    }

    /// Resolve the acting user from a bearer access token.
    pub async fn resolve_actor(&self, token: &str) -> StaffResult<User> {
        let claims = self.tokens.verify(token, TokenPurpose::Access)?;
        let user_id: Uuid = claims.sub.parse().map_err(|_| StaffError::TokenInvalid)?;

        self.repository
            .get_by_id(user_id)
            .await?
            .ok_or(StaffError::TokenInvalid)
    }

    // Token helpers

    async fn issue_pair(&self, user: &mut User) -> StaffResult<TokenPairResponse> {
        let access_token = self.tokens.create_access_token(user.id, &user.email)?;
        let refresh_token = self.tokens.create_refresh_token(user.id, &user.email)?;

        user.refresh_token_digest = Some(refresh_digest(&refresh_token));
        user.updated_at = Utc::now();
        *user = self.repository.update(user.clone()).await?;

        Ok(TokenPairResponse {
            access_token,
            refresh_token,
        })
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> StaffResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StaffError::Internal(format!("Password hash error: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> StaffResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| StaffError::Internal(format!("Password hash error: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn parse_role_names(names: &[String]) -> StaffResult<Vec<RoleName>> {
    names
        .iter()
        .map(|n| {
            n.parse::<RoleName>()
                .map_err(|_| StaffError::InvalidRole(n.clone()))
        })
        .collect()
}

/// SHA-256 hex digest of a refresh token, the only form stored server-side.
fn refresh_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
