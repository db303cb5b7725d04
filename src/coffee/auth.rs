//! Bearer-token verification and per-route permission checks.
//!
//! Handlers declare the permission they need through the [`Authorized`]
//! extractor; the request is rejected before the handler body runs.

use super::state::CoffeeApp;
use crate::constants::*;
use crate::envelope::ApiError;
use crate::observability::metrics;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
    pub status: StatusCode,
}

impl AuthError {
    fn new(status: StatusCode, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            status,
        }
    }

    pub fn missing_header() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "authorization_header_missing",
            "Authorization header is expected.",
        )
    }

    pub fn invalid_header(description: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid_header", description)
    }

    pub fn expired() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "token_expired", "Token expired.")
    }

    pub fn invalid_claims() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    pub fn unparseable() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_header",
            "Unable to parse authentication token.",
        )
    }

    pub fn unknown_key() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_header",
            "Unable to find the appropriate key.",
        )
    }

    pub fn missing_permissions() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_claims",
            "Permissions not included in JWT.",
        )
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "unauthorized",
            "Permission not found.",
        )
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::expired(),
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::invalid_claims(),
            _ => {
                debug!("Token rejected: {err}");
                AuthError::unparseable()
            }
        }
    }
}

/// The claims the coffee shop reads from a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Validates a bearer credential and returns its claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// HS256 tokens signed with a shared secret. Used for local development
/// and tests.
pub struct SharedSecretVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SharedSecretVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience.filter(|aud| !aud.is_empty()) {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for SharedSecretVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(decode::<Claims>(token, &self.key, &self.validation)?.claims)
    }
}

/// Where a [`JwksVerifier`] loads the provider's signing keys from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<JwkSet>;
}

/// Keys published at `https://<domain>/.well-known/jwks.json`.
pub struct HttpKeySource {
    url: String,
    client: reqwest::Client,
}

impl HttpKeySource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch(&self) -> anyhow::Result<JwkSet> {
        info!("Fetching signing keys from {}", self.url);
        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(keys)
    }
}

#[derive(Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

impl KeyCache {
    fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.as_ref().and_then(|keys| keys.find(kid))
    }

    fn may_refresh(&self, cooldown: Duration) -> bool {
        match (&self.keys, self.fetched_at) {
            (Some(_), Some(at)) => at.elapsed() >= cooldown,
            _ => true,
        }
    }
}

/// RS256 tokens issued by the identity provider. The key set is cached and
/// refetched when a token names a `kid` it does not contain, at most once
/// per cooldown.
pub struct JwksVerifier {
    source: Arc<dyn KeySource>,
    issuer: String,
    audience: String,
    cooldown: Duration,
    cache: RwLock<KeyCache>,
}

impl JwksVerifier {
    pub fn new(domain: &str, audience: &str) -> Self {
        let domain = domain.trim_end_matches('/');
        Self::with_source(
            Arc::new(HttpKeySource::new(format!(
                "https://{domain}/.well-known/jwks.json"
            ))),
            &format!("https://{domain}/"),
            audience,
            JWKS_REFRESH_COOLDOWN,
        )
    }

    pub fn with_source(
        source: Arc<dyn KeySource>,
        issuer: &str,
        audience: &str,
        cooldown: Duration,
    ) -> Self {
        Self {
            source,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            cooldown,
            cache: RwLock::new(KeyCache::default()),
        }
    }

    /// Decoding key for `kid`. An unknown `kid` refreshes the key set first,
    /// unless the last fetch is younger than the cooldown.
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let cached = self.cache.read().await.find(kid).cloned();
        if let Some(jwk) = cached {
            return Ok(DecodingKey::from_jwk(&jwk)?);
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed the set while this one waited
        if cache.find(kid).is_none() && cache.may_refresh(self.cooldown) {
            match self.source.fetch().await {
                Ok(keys) => {
                    debug!(keys = keys.keys.len(), "Signing keys refreshed");
                    cache.keys = Some(keys);
                }
                Err(e) => error!("Could not load signing keys: {e:#}"),
            }
            cache.fetched_at = Some(Instant::now());
        }
        let jwk = cache.find(kid).ok_or_else(AuthError::unknown_key)?;
        Ok(DecodingKey::from_jwk(jwk)?)
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            decode_header(token).map_err(|_| AuthError::invalid_header("Authorization malformed."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;
        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        Ok(decode::<Claims>(token, &key, &validation)?.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(AuthError::missing_header)?
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization malformed."))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::missing_header()),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header("Token not found.")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::invalid_header(
            "Authorization header must be bearer token.",
        )),
    }
}

pub fn check_permission(claims: &Claims, permission: &str) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_ref()
        .ok_or_else(AuthError::missing_permissions)?;
    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::forbidden())
    }
}

/// A permission a route requires, named as it appears in the token.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permission {
    ($name:ident, $value:expr) => {
        pub struct $name;

        impl Permission for $name {
            const NAME: &'static str = $value;
        }
    };
}

permission!(GetDrinksDetail, PERM_GET_DRINKS_DETAIL);
permission!(PostDrinks, PERM_POST_DRINKS);
permission!(PatchDrinks, PERM_PATCH_DRINKS);
permission!(DeleteDrinks, PERM_DELETE_DRINKS);
permission!(GetBaristas, PERM_GET_BARISTAS);
permission!(PostBaristas, PERM_POST_BARISTAS);
permission!(GetManagers, PERM_GET_MANAGERS);
permission!(PostManagers, PERM_POST_MANAGERS);

/// Proof that the request carried a valid token holding permission `P`.
pub struct Authorized<P> {
    pub claims: Claims,
    _permission: PhantomData<fn() -> P>,
}

#[async_trait]
impl<P: Permission> FromRequestParts<CoffeeApp> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, app: &CoffeeApp) -> Result<Self, Self::Rejection> {
        let outcome = async {
            let token = bearer_token(&parts.headers)?;
            let claims = app.verifier.verify(token).await?;
            check_permission(&claims, P::NAME)?;
            Ok::<_, AuthError>(claims)
        }
        .await;

        match outcome {
            Ok(claims) => {
                debug!(
                    subject = claims.sub.as_deref().unwrap_or("-"),
                    permission = P::NAME,
                    "Request authorized"
                );
                Ok(Self {
                    claims,
                    _permission: PhantomData,
                })
            }
            Err(err) => {
                metrics::coffee::auth_failure(err.code);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "test-secret";

    fn token(claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_header_shapes() {
        assert_eq!(
            bearer_token(&HeaderMap::new()).unwrap_err().code,
            "authorization_header_missing"
        );
        assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");

        for bad in ["Basic abc", "Bearer", "Bearer a b"] {
            let err = bearer_token(&headers(bad)).unwrap_err();
            assert_eq!(err.code, "invalid_header", "{bad}");
            assert_eq!(err.status, StatusCode::UNAUTHORIZED, "{bad}");
        }
    }

    #[test]
    fn permission_checks() {
        let claims = Claims {
            sub: None,
            permissions: Some(vec!["get:drinks-detail".into()]),
        };
        assert!(check_permission(&claims, PERM_GET_DRINKS_DETAIL).is_ok());

        let err = check_permission(&claims, PERM_POST_DRINKS).unwrap_err();
        assert_eq!((err.status, err.code), (StatusCode::FORBIDDEN, "unauthorized"));

        let err = check_permission(&Claims::default(), PERM_POST_DRINKS).unwrap_err();
        assert_eq!((err.status, err.code), (StatusCode::BAD_REQUEST, "invalid_claims"));
    }

    #[tokio::test]
    async fn shared_secret_verifier_maps_failures() {
        let verifier = SharedSecretVerifier::new(SECRET, Some("drinks"));

        let ok = token(json!({"sub": "barista", "aud": "drinks", "exp": future_exp(), "permissions": ["get:drinks-detail"]}));
        let claims = verifier.verify(&ok).await.unwrap();
        assert_eq!(claims.sub.as_deref(), Some("barista"));

        let expired = token(json!({"aud": "drinks", "exp": 1_000, "permissions": []}));
        assert_eq!(verifier.verify(&expired).await.unwrap_err().code, "token_expired");

        let wrong_aud = token(json!({"aud": "tea", "exp": future_exp(), "permissions": []}));
        let err = verifier.verify(&wrong_aud).await.unwrap_err();
        assert_eq!((err.status, err.code), (StatusCode::UNAUTHORIZED, "invalid_claims"));

        let err = verifier.verify("garbage").await.unwrap_err();
        assert_eq!((err.status, err.code), (StatusCode::BAD_REQUEST, "invalid_header"));
    }

    const OLD_KEYS: &str = r#"{"keys":[{"kty":"RSA","kid":"old","n":"AQAB","e":"AQAB"}]}"#;
    const ROTATED_KEYS: &str = r#"{"keys":[
        {"kty":"RSA","kid":"old","n":"AQAB","e":"AQAB"},
        {"kty":"RSA","kid":"new","n":"AQAB","e":"AQAB"}
    ]}"#;

    /// Serves `sets` in order, repeating the last one, and counts fetches.
    struct RotatingKeys {
        sets: Vec<&'static str>,
        fetches: AtomicUsize,
    }

    impl RotatingKeys {
        fn new(sets: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                sets,
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeySource for RotatingKeys {
        async fn fetch(&self) -> anyhow::Result<JwkSet> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            let json = self.sets[n.min(self.sets.len() - 1)];
            Ok(serde_json::from_str(json)?)
        }
    }

    fn jwks_verifier(source: Arc<RotatingKeys>, cooldown: Duration) -> JwksVerifier {
        JwksVerifier::with_source(source, "https://tenant.example/", "drinks", cooldown)
    }

    #[tokio::test]
    async fn rotated_key_is_picked_up_by_a_refetch() {
        let source = RotatingKeys::new(vec![OLD_KEYS, ROTATED_KEYS]);
        let verifier = jwks_verifier(source.clone(), Duration::ZERO);

        assert!(verifier.key_for("old").await.is_ok());
        assert_eq!(source.fetches(), 1);

        assert!(verifier.key_for("new").await.is_ok());
        assert_eq!(source.fetches(), 2);

        // Known kids are served from the cache
        assert!(verifier.key_for("old").await.is_ok());
        assert!(verifier.key_for("new").await.is_ok());
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn unknown_kid_refetches_at_most_once_per_cooldown() {
        let source = RotatingKeys::new(vec![OLD_KEYS, ROTATED_KEYS]);
        let verifier = jwks_verifier(source.clone(), Duration::from_secs(3600));

        assert!(verifier.key_for("old").await.is_ok());
        for _ in 0..3 {
            let err = verifier.key_for("new").await.err().unwrap();
            assert_eq!(err, AuthError::unknown_key());
        }
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn kid_missing_after_refetch_is_rejected() {
        let source = RotatingKeys::new(vec![OLD_KEYS]);
        let verifier = jwks_verifier(source.clone(), Duration::ZERO);

        let err = verifier.key_for("gone").await.err().unwrap();
        assert_eq!((err.status, err.code), (StatusCode::BAD_REQUEST, "invalid_header"));
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn audience_check_is_skipped_when_unset() {
        let verifier = SharedSecretVerifier::new(SECRET, None);
        let t = token(json!({"aud": "anything", "exp": future_exp()}));
        let claims = verifier.verify(&t).await.unwrap();
        assert_eq!(claims.permissions, None);
    }
}
