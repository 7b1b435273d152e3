//! Standard error messages and codes for consistent error responses.

// Message constants
pub const VALIDATION_FAILED: &str = "Request validation failed";
pub const NOT_FOUND_RESOURCE: &str = "The requested resource was not found";
pub const METHOD_NOT_ALLOWED: &str = "The HTTP method is not allowed for this resource";

// Error codes for observability and debugging
pub const CODE_VALIDATION: i32 = 1001;
pub const CODE_NOT_FOUND: i32 = 1004;
pub const CODE_INTERNAL: i32 = 1005;
