use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::WebError;

/// Identity of the caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Bearer keys accepted by the API, each bound to the user it authenticates.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, Uuid>>,
}

impl ApiKeys {
    /// Parses `key=user-uuid` pairs separated by commas. Malformed entries are skipped.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| {
                let parsed = entry.split_once('=').and_then(|(key, user)| {
                    let key = key.trim();
                    let user = Uuid::parse_str(user.trim()).ok()?;
                    (!key.is_empty()).then(|| (key.to_string(), user))
                });

                if parsed.is_none() {
                    tracing::warn!("Skipping malformed API_KEYS entry");
                }
                parsed
            })
            .collect();

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn user_for(&self, key: &str) -> Option<Uuid> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(WebError::Unauthorized)?;

    let Some(user_id) = api_keys.user_for(token) else {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    };

    req.extensions_mut().insert(AuthenticatedUser(user_id));

    Ok(next.run(req).await)
}
