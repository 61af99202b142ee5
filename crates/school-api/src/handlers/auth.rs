//! POST /login

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{scopes_for_role, PasswordService};
use crate::database::User;
use crate::state::AppState;
use crate::utils::{ApiError, ValidJson};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Which account identifier the caller supplied.
#[derive(Debug, PartialEq, Eq)]
enum LoginId<'a> {
    Email(&'a str),
    Username(&'a str),
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl LoginRequest {
    /// Email wins when both are supplied; blank fields count as absent.
    fn login(&self) -> Option<LoginId<'_>> {
        non_blank(&self.email)
            .map(LoginId::Email)
            .or_else(|| non_blank(&self.username).map(LoginId::Username))
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: User,
    pub permissions: Vec<String>,
}

fn invalid_credentials() -> ApiError {
    ApiError::Forbidden("invalid credentials".into())
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let lookup = match request.login() {
        Some(LoginId::Email(email)) => state.repository.find_user_by_email(email).await?,
        Some(LoginId::Username(username)) => {
            state.repository.find_user_by_username(username).await?
        }
        None => {
            return Err(ApiError::Validation(
                "email or username is required".into(),
            ))
        }
    };

    let password = request.password;
    let user = match lookup {
        Some(user) => user,
        None => {
            PasswordService::verify_unknown(password).await;
            warn!("Login attempt for an unknown account");
            return Err(invalid_credentials());
        }
    };

    let verified = PasswordService::verify(password, user.actual_password.clone())
        .await
        .map_err(|e| ApiError::Internal(format!("stored hash for user {}: {}", user.id, e)))?;

    if !verified {
        warn!("Wrong password for user {}", user.id);
        return Err(invalid_credentials());
    }

    let permissions = scopes_for_role(&user.role);
    let token = state
        .jwt
        .generate_token(user.id, &user.role, permissions.clone())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("User {} logged in as {}", user.id, user.role);

    Ok(Json(LoginResponse {
        success: true,
        token,
        token_type: "Bearer",
        expires_in: state.jwt.expiration_seconds(),
        user,
        permissions,
    }))
}
