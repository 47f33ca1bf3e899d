use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use millqc_core::{AppError, UserIdentity};

use crate::error::ApiResult;

/// Header carrying the authenticated email, set by the fronting auth proxy.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Optional header carrying the stable subject id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Optional header carrying the display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

pub async fn require_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn identity_from_headers(headers: &axum::http::HeaderMap) -> Result<UserIdentity, AppError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let email = header(USER_EMAIL_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let subject = header(USER_ID_HEADER).unwrap_or(email);
    let display_name = header(USER_NAME_HEADER).unwrap_or(email);

    Ok(UserIdentity::new(
        subject,
        display_name,
        Some(email.to_owned()),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{USER_EMAIL_HEADER, USER_ID_HEADER, identity_from_headers};

    #[test]
    fn missing_email_is_unauthorized() {
        assert!(identity_from_headers(&HeaderMap::new()).is_err());
    }

    #[test]
    fn subject_defaults_to_email() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_EMAIL_HEADER,
            HeaderValue::from_static("QC@EasternMills.com"),
        );

        let identity = identity_from_headers(&headers).unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.subject(), "QC@EasternMills.com");
        assert_eq!(identity.email(), Some("qc@easternmills.com"));
    }

    #[test]
    fn explicit_subject_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_EMAIL_HEADER, HeaderValue::from_static("qc@easternmills.com"));
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("google-oauth2|42"));

        let identity = identity_from_headers(&headers).unwrap_or_else(|_| unreachable!());
        assert_eq!(identity.subject(), "google-oauth2|42");
    }
}
