//! HTTP Basic authentication gate.
//!
//! Applied to every route except `/api/health`. A missing header gets
//! `401 Authentication required`; wrong credentials get `401 Access denied`.
//! Both carry a `WWW-Authenticate` challenge so browsers prompt for a login.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Path that bypasses authentication.
pub const HEALTH_PATH: &str = "/api/health";

/// Challenge sent with every 401.
pub const CHALLENGE: &str = "Basic realm=\"LLM Tutor Area\"";

/// Expected Basic-auth credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header_value: &str) -> bool {
        decode_credentials(header_value)
            .is_some_and(|(user, pass)| user == self.username && pass == self.password)
    }

    /// `Authorization` header value for these credentials.
    pub fn header_value(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.username, self.password))
        )
    }
}

/// Decode `Basic base64(user:pass)` into its parts. The password may contain
/// colons; the username may not.
pub fn decode_credentials(header_value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn challenge(body: &'static str) -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

/// Middleware enforcing [`BasicAuth`] on everything but the health check.
pub async fn require_basic_auth(
    State(auth): State<Arc<BasicAuth>>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let verdict = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().is_ok_and(|s| auth.verify(s)));

    match verdict {
        None => challenge("Authentication required"),
        Some(true) => next.run(request).await,
        Some(false) => {
            debug!("Rejected credentials for {}", request.uri().path());
            challenge("Access denied")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_basic_header() {
        // "admin:password"
        let creds = decode_credentials("Basic YWRtaW46cGFzc3dvcmQ=").unwrap();
        assert_eq!(creds, ("admin".to_string(), "password".to_string()));
    }

    #[test]
    fn password_may_contain_colons() {
        let auth = BasicAuth::new("u", "p:a:ss");
        assert!(auth.verify(&auth.header_value()));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(decode_credentials("Bearer YWRtaW46cGFzc3dvcmQ=").is_none());
        assert!(decode_credentials("Basic !!!").is_none());
        assert!(decode_credentials("Basic").is_none());
        // "nocolon"
        assert!(decode_credentials("Basic bm9jb2xvbg==").is_none());
    }

    #[test]
    fn verify_checks_both_fields() {
        let auth = BasicAuth::new("admin", "password");
        assert!(auth.verify("Basic YWRtaW46cGFzc3dvcmQ="));
        assert!(!auth.verify(&BasicAuth::new("admin", "wrong").header_value()));
        assert!(!auth.verify(&BasicAuth::new("root", "password").header_value()));
    }
}
