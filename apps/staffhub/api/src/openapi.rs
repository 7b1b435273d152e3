use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        axum_helpers::ErrorResponse,
        domain_staff::RegisterRequest,
        domain_staff::ActivateRequest,
        domain_staff::LoginRequest,
        domain_staff::RefreshRequest,
        domain_staff::UpdateUserRequest,
        domain_staff::SendEmailRequest,
        domain_staff::UserResponse,
        domain_staff::TokenPairResponse,
        domain_staff::MessageResponse,
        domain_staff::UserStatus,
    )),
    info(
        title = "StaffHub API",
        version = "0.1.0",
        description = "API for staff onboarding, authentication and role-based user management"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    tags(
        (name = "auth", description = "Registration, activation, login and token management"),
        (name = "users", description = "Staff user management"),
        (name = "email", description = "Ad-hoc email delivery")
    )
)]
pub struct ApiDoc;
