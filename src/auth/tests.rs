//! Tests for auth module
//!
//! These tests verify token checking and the verified-caller extractor:
//! - HS256 identity tokens decode to their subject
//! - Missing or forged tokens are rejected as unauthorized
//! - Dev mode bypasses verification with the configured identity

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::test_support::{setup_test_db, test_state, token_for, FakeBilling, TEST_JWT_SECRET};
    use crate::common::ApiError;
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use std::sync::Arc;

    async fn extract(authorization: Option<&str>, dev_mode: bool) -> Result<AuthedUser, ApiError> {
        let pool = setup_test_db().await;
        let state = test_state(&pool, Arc::new(FakeBilling::missing()));
        state.write().await.dev_mode.enabled = dev_mode;

        let mut builder = Request::builder().uri("/api/stats").extension(state);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();

        AuthedUser::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_verify_token_accepts_bearer_and_raw() {
        let token = token_for("identity-abc-123");

        let claims = extractors::verify_token(&format!("Bearer {}", token), TEST_JWT_SECRET).unwrap();
        assert_eq!(claims.sub, "identity-abc-123");
        assert_eq!(claims.email.as_deref(), Some("writer@example.com"));

        let claims = extractors::verify_token(&token, TEST_JWT_SECRET).unwrap();
        assert_eq!(claims.sub, "identity-abc-123");
    }

    #[test]
    fn test_verify_token_rejects_wrong_secret() {
        let claims = models::Claims {
            sub: "identity-abc-123".to_string(),
            exp: 9999999999,
            email: None,
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"not_the_secret"),
        )
        .unwrap();

        let result = extractors::verify_token(&forged, TEST_JWT_SECRET);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_token_rejects_expired() {
        let claims = models::Claims {
            sub: "identity-abc-123".to_string(),
            exp: 1,
            email: None,
        };
        let expired = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(extractors::verify_token(&expired, TEST_JWT_SECRET).is_err());
    }

    #[test]
    fn test_verify_token_rejects_empty_bearer() {
        assert!(matches!(
            extractors::verify_token("Bearer ", TEST_JWT_SECRET),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_claims_without_email_deserialize() {
        let claims: models::Claims =
            serde_json::from_value(serde_json::json!({ "sub": "abc", "exp": 10 })).unwrap();
        assert_eq!(claims.sub, "abc");
        assert!(claims.email.is_none());
    }

    #[tokio::test]
    async fn test_extractor_yields_token_subject() {
        let header = format!("Bearer {}", token_for("identity-abc-123"));

        let user = extract(Some(&header), false).await.unwrap();

        assert_eq!(user.id, "identity-abc-123");
    }

    #[tokio::test]
    async fn test_extractor_requires_authorization_header() {
        let result = extract(None, false).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_dev_mode_bypasses_verification() {
        let user = extract(None, true).await.unwrap();

        assert_eq!(user.id, "dev-identity-0000000001");
        assert_eq!(user.email.as_deref(), Some("dev@test.com"));
    }
}
