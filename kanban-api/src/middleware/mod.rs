/// Middleware modules for the API server
///
/// - `identity`: resolves the calling user from request headers
/// - `security`: security response headers

pub mod identity;
pub mod security;
