use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use foodgram_user::{Role, validate_jwt};
use serde_json::json;

use crate::error::AppError;
use crate::routes::AppState;

/// Identity of the authenticated caller, inserted as a request extension.
#[derive(Clone, Debug)]
pub struct Auth {
    pub user_id: String,
    pub role: Role,
}

impl Auth {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Caller identity on routes that serve both anonymous and authenticated
/// requests. Always present where [`optional_auth_middleware`] runs.
#[derive(Clone, Debug)]
pub struct MaybeAuth(pub Option<Auth>);

/// Requires a valid bearer token.
///
/// Validates the JWT, verifies the user still exists and rejects blocked
/// accounts here so no handler has to check the role itself.
pub async fn auth_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(&req) else {
        return unauthorized("Authentication credentials were not provided");
    };

    match resolve(&state, &token).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Same as [`auth_middleware`] but lets anonymous requests through. A
/// present-but-invalid token is still rejected rather than silently
/// downgraded to anonymous.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth = match bearer_token(&req) {
        Some(token) => match resolve(&state, &token).await {
            Ok(auth) => Some(auth),
            Err(response) => return response,
        },
        None => None,
    };

    req.extensions_mut().insert(MaybeAuth(auth));
    next.run(req).await
}

async fn resolve(state: &AppState, token: &str) -> Result<Auth, Response> {
    let claims = match validate_jwt(token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(error) => {
            tracing::debug!("rejected token: {error}");
            return Err(unauthorized("Invalid token"));
        }
    };

    let user = match state.user.find_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(unauthorized("Invalid token")),
        Err(error) => return Err(AppError::from(error).into_response()),
    };

    let role = user.role();

    if role.is_blocked() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "detail": "Your account has been blocked" })),
        )
            .into_response());
    }

    Ok(Auth {
        user_id: user.id,
        role,
    })
}

/// Accepts both `Bearer <jwt>` and the legacy `Token <jwt>` scheme.
fn bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;

    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::to_owned)
}

fn unauthorized(detail: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}
