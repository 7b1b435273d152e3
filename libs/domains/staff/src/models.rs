use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
    Disabled,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Pending => write!(f, "PENDING"),
            UserStatus::Active => write!(f, "ACTIVE"),
            UserStatus::Disabled => write!(f, "DISABLED"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(UserStatus::Pending),
            "ACTIVE" => Ok(UserStatus::Active),
            "DISABLED" => Ok(UserStatus::Disabled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Role names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleName {
    Md,
    Hr,
    Worker,
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleName::Md => write!(f, "MD"),
            RoleName::Hr => write!(f, "HR"),
            RoleName::Worker => write!(f, "WORKER"),
        }
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MD" => Ok(RoleName::Md),
            "HR" => Ok(RoleName::Hr),
            "WORKER" => Ok(RoleName::Worker),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Permission names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionName {
    CreateStaff,
    ViewStaff,
    EditStaffDetails,
    DeleteStaff,
}

impl std::fmt::Display for PermissionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionName::CreateStaff => write!(f, "CREATE_STAFF"),
            PermissionName::ViewStaff => write!(f, "VIEW_STAFF"),
            PermissionName::EditStaffDetails => write!(f, "EDIT_STAFF_DETAILS"),
            PermissionName::DeleteStaff => write!(f, "DELETE_STAFF"),
        }
    }
}

impl std::str::FromStr for PermissionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATE_STAFF" => Ok(PermissionName::CreateStaff),
            "VIEW_STAFF" => Ok(PermissionName::ViewStaff),
            "EDIT_STAFF_DETAILS" => Ok(PermissionName::EditStaffDetails),
            "DELETE_STAFF" => Ok(PermissionName::DeleteStaff),
            _ => Err(format!("Unknown permission: {}", s)),
        }
    }
}

/// A grantable permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    pub name: PermissionName,
}

/// A role with its attached permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub permissions: Vec<Permission>,
}

/// Staff user entity - matches SQL schema
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased email (unique)
    pub email: String,
    /// Argon2 hash, absent until the account is activated
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub status: UserStatus,
    /// Pending activation token, cleared on activation
    #[serde(skip_serializing)]
    pub activation_token: Option<String>,
    #[serde(skip_serializing)]
    pub activation_token_expires: Option<DateTime<Utc>>,
    /// SHA-256 digest of the latest refresh token
    #[serde(skip_serializing)]
    pub refresh_token_digest: Option<String>,
    /// Who registered this user
    pub created_by: Option<Uuid>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a pending user awaiting activation.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        roles: Vec<Role>,
        created_by: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            first_name,
            last_name,
            email: email.to_lowercase(),
            password_hash: None,
            status: UserStatus::Pending,
            activation_token: None,
            activation_token_expires: None,
            refresh_token_digest: None,
            created_by,
            roles,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_role(&self, name: RoleName) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn role_names(&self) -> Vec<RoleName> {
        self.roles.iter().map(|r| r.name).collect()
    }
}

/// User response DTO (without credential fields)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
    /// Union of permissions granted by the user's roles
    pub permissions: Vec<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let permissions = crate::policy::permissions_of(&user)
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            status: user.status,
            roles: user.roles.iter().map(|r| r.name.to_string()).collect(),
            permissions,
            created_by: user.created_by,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for registering a new staff member
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1))]
    pub roles: Vec<String>,
}

/// DTO for activating a pending account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ActivateRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// DTO for login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// DTO for refreshing a token pair
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// DTO for sending an ad-hoc email
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendEmailRequest {
    #[validate(length(min = 1))]
    pub recipients: Vec<String>,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

/// Access/refresh pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Simple acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
