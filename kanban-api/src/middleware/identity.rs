/// Identity resolution middleware
///
/// The board has no login. Each request names its caller through two
/// optional headers:
///
/// - `x-user-id`: an existing user's id (ignored unless it parses as an integer)
/// - `x-user-email`: UTF-8, trimmed and lower-cased; absent or blank means
///   `demo@local`, undecodable bytes are rejected with 400
///
/// The id wins when it matches a user. Otherwise the user is found or
/// created by email. The resolved [`User`] is inserted into the request
/// extensions for handlers to take with `Extension<User>`.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Extension, Router};
/// use kanban_api::{app::AppState, middleware::identity::resolve_identity};
/// use kanban_shared::models::user::User;
///
/// async fn whoami(Extension(user): Extension<User>) -> String {
///     user.email
/// }
///
/// fn routes(state: AppState) -> Router<AppState> {
///     Router::new()
///         .route("/api/whoami", get(whoami))
///         .layer(axum::middleware::from_fn_with_state(state, resolve_identity))
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use kanban_shared::models::user::{normalize_email, User};

use crate::{app::AppState, error::ApiError};

/// Header carrying an optional numeric user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying an optional email address
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Caller identity as read from headers, before any database lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHint {
    pub user_id: Option<i64>,

    /// Always present; already normalized
    pub email: String,
}

impl IdentityHint {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());

        // Header values may carry any byte above 0x7f; emails are decoded as UTF-8
        let raw_email = match headers.get(USER_EMAIL_HEADER) {
            Some(value) => Some(
                std::str::from_utf8(value.as_bytes())
                    .map_err(|_| ApiError::BadRequest("Invalid x-user-email".to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            user_id,
            email: normalize_email(raw_email),
        })
    }
}

/// Resolves the caller, creating the user on first sight
pub async fn resolve_user(state: &AppState, hint: &IdentityHint) -> Result<User, sqlx::Error> {
    if let Some(id) = hint.user_id {
        if let Some(user) = User::find_by_id(&state.db, id).await? {
            return Ok(user);
        }
        tracing::debug!(user_id = id, "Unknown x-user-id, falling back to email");
    }

    User::find_or_create_by_email(&state.db, &hint.email).await
}

/// Middleware that attaches the resolved [`User`] to the request
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let hint = IdentityHint::from_headers(req.headers())?;
    let user = resolve_user(&state, &hint).await?;

    tracing::debug!(user_id = user.id, email = %user.email, "Resolved caller");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
