use axum::Router;
use domain_staff::handlers;

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::auth_router(state.staff.clone())
}
