use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{Credentials, SessionResponse, SessionUserView, SessionView},
        errors::AuthError,
        jwt::SessionUser,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/session", get(session))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<SessionResponse>, AuthError> {
    let credentials = match payload {
        Ok(Json(c)) => c,
        Err(rejection) => {
            warn!(error = %rejection, "login body rejected");
            return Err(AuthError::Validation {
                missing: vec!["email", "password"],
            });
        }
    };

    let issued = state.issuer.authorize(&credentials).await?;
    Ok(Json(SessionResponse {
        token: issued.session.token,
        token_type: "Bearer",
        expires_at: issued.session.expires_at,
        user: issued.user,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn session(user: SessionUser) -> Json<SessionView> {
    Json(SessionView {
        user: SessionUserView {
            id: user.id,
            role: user.role,
        },
        expires_at: user.expires_at,
    })
}
