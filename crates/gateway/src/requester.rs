//! Requester identity extraction
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the caller's user id arrives in the `X-User-ID` header. What the
//! user may do is decided per action by the verification engine, never here.

use axum::{extract::FromRequestParts, http::request::Parts};
use reviewflow_common::errors::AppError;

/// Header carrying the already-authenticated caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub i64);

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .map(Requester)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing or invalid X-User-ID header".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn extract(request: Request<()>) -> Result<Requester, AppError> {
        let (mut parts, _) = request.into_parts();
        tokio_test::block_on(Requester::from_request_parts(&mut parts, &()))
    }

    #[test]
    fn test_valid_header() {
        let request = Request::builder()
            .header("X-User-ID", "42")
            .body(())
            .unwrap();
        assert_eq!(extract(request).unwrap(), Requester(42));
    }

    #[test]
    fn test_missing_header() {
        let request = Request::builder().body(()).unwrap();
        assert!(extract(request).is_err());
    }

    #[test]
    fn test_non_numeric_header() {
        let request = Request::builder()
            .header("X-User-ID", "alice")
            .body(())
            .unwrap();
        assert!(extract(request).is_err());
    }
}
