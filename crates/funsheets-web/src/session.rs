//! Request-scoped session: who is signed in and which parent they are.
//!
//! The identity provider sits in front of this service and forwards the
//! signed-in user in request headers. Each request builds its own
//! [`Session`]; nothing about the current user is kept between requests.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use database::{parent, Database, Identity, ParentProfile};
use tracing::{info, warn};

use crate::config::AuthHeaders;
use crate::error::{Result, WebError};
use crate::state::AppState;

/// Link between the signed-in identity and its parent profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentLink {
    Linked(ParentProfile),
    /// Resolution failed; the reason is shown to the user.
    Unavailable(String),
}

/// The signed-in user for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub parent: ParentLink,
}

impl Session {
    /// Resolve the parent for `identity`, degrading instead of failing.
    pub async fn establish(db: &Database, identity: Identity) -> Self {
        let parent = match parent::resolve_parent(db.pool(), &identity).await {
            Ok(resolution) => {
                if resolution.was_created() {
                    info!(auth_id = %identity.auth_id, "First sign-in, parent profile created");
                }
                ParentLink::Linked(resolution.into_profile())
            }
            Err(err) => {
                warn!(auth_id = %identity.auth_id, error = %err, "Could not resolve parent profile");
                ParentLink::Unavailable(err.to_string())
            }
        };

        Self { identity, parent }
    }

    /// The parent profile, or a recoverable error if it could not be loaded.
    pub fn parent(&self) -> Result<&ParentProfile> {
        match &self.parent {
            ParentLink::Linked(profile) => Ok(profile),
            ParentLink::Unavailable(reason) => Err(WebError::ProfileUnavailable(reason.clone())),
        }
    }

    /// Shorthand for the parent id.
    pub fn parent_id(&self) -> Result<&str> {
        self.parent().map(|p| p.id.as_str())
    }
}

/// Read the identity headers. A missing or blank user id means not signed in.
pub fn identity_from_headers(headers: &HeaderMap, auth: &AuthHeaders) -> Result<Identity> {
    let auth_id = headers
        .get(&auth.user_id)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(WebError::Unauthorized)?;

    let email = headers
        .get(&auth.email)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    Ok(Identity::new(auth_id, email))
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let identity = identity_from_headers(&parts.headers, &state.auth)?;
        Ok(Session::establish(&state.db, identity).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_identity_from_headers() {
        let auth = AuthHeaders::default();
        let identity = identity_from_headers(
            &headers(&[("x-auth-user-id", " user-1 "), ("x-auth-email", "p@example.com")]),
            &auth,
        )
        .unwrap();
        assert_eq!(identity, Identity::new("user-1", "p@example.com"));
    }

    #[test]
    fn test_missing_email_is_empty() {
        let auth = AuthHeaders::default();
        let identity = identity_from_headers(&headers(&[("x-auth-user-id", "user-1")]), &auth).unwrap();
        assert_eq!(identity.email, "");
    }

    #[test]
    fn test_missing_user_is_unauthorized() {
        let auth = AuthHeaders::default();
        for map in [headers(&[]), headers(&[("x-auth-user-id", "  ")])] {
            assert!(matches!(
                identity_from_headers(&map, &auth),
                Err(WebError::Unauthorized)
            ));
        }
    }

    #[tokio::test]
    async fn test_establish_links_parent() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1).await.unwrap();
        db.migrate().await.unwrap();

        let session = Session::establish(&db, Identity::new("user-1", "p@example.com")).await;
        let parent = session.parent().unwrap();
        assert_eq!(parent.auth_id, "user-1");

        let again = Session::establish(&db, Identity::new("user-1", "p@example.com")).await;
        assert_eq!(again.parent_id().unwrap(), parent.id);
    }

    #[tokio::test]
    async fn test_establish_degrades_when_store_fails() {
        // No migrations: the parents table does not exist.
        let db = Database::connect_with_pool_size("sqlite::memory:", 1).await.unwrap();

        let session = Session::establish(&db, Identity::new("user-1", "p@example.com")).await;
        assert_eq!(session.identity.auth_id, "user-1");
        assert!(matches!(session.parent, ParentLink::Unavailable(_)));
        assert!(matches!(session.parent(), Err(WebError::ProfileUnavailable(_))));
    }
}
