use std::{collections::BTreeSet, time::Duration};

use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Role
///
/// Privilege levels carried in the token's `roles` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Parses a claim value. Both `ADMIN` and `ROLE_ADMIN` spellings are accepted,
    /// case-insensitively; anything unrecognised yields `None`.
    pub fn from_claim(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(upper.as_str()) {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_claim(self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::User => "ROLE_USER",
        }
    }
}

/// Claims
///
/// Payload of the HS256 bearer tokens this service accepts.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the principal's name.
    pub sub: String,
    /// Role names, e.g. `["ROLE_ADMIN"]`. Unknown entries are ignored.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued At (iat), seconds since the epoch. Optional; not every issuer sets it.
    #[serde(default)]
    pub iat: u64,
    /// Expiration Time (exp), seconds since the epoch. Always validated.
    pub exp: u64,
}

/// AuthUser
///
/// The resolved principal of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub subject: String,
    pub roles: BTreeSet<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            subject: claims.sub,
            roles: claims
                .roles
                .iter()
                .filter_map(|raw| Role::from_claim(raw))
                .collect(),
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Resolves the principal from `Authorization: Bearer <jwt>`, verifying signature and
/// expiry against `AppConfig::jwt_secret`.
///
/// Rejection: `AppError::Unauthorized` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the JWT secret).
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired bearer token"),
                other => tracing::debug!(reason = ?other, "rejected bearer token"),
            }
            AppError::Unauthorized
        })?;

        Ok(AuthUser::from(token_data.claims))
    }
}

/// require_admin
///
/// Route-layer middleware for every mutating endpoint. Authenticates via the `AuthUser`
/// extractor (401 on failure) and then demands the ADMIN role (403 otherwise). The
/// handler, and therefore any state change, only runs once both checks pass.
pub async fn require_admin(
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.has_role(Role::Admin) {
        tracing::warn!(
            subject = %user.subject,
            method = %request.method(),
            uri = %request.uri(),
            "non-admin principal attempted a write"
        );
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// issue_token
///
/// Signs an HS256 token for `subject` with the given roles, valid for `ttl`. Tokens are
/// normally minted by the identity provider; this is its counterpart for tooling and tests.
pub fn issue_token(
    secret: &str,
    subject: &str,
    roles: &[Role],
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    let claims = Claims {
        sub: subject.to_string(),
        roles: roles.iter().map(|role| role.as_claim().to_string()).collect(),
        iat: now,
        exp: now.saturating_add(ttl.as_secs()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
