use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    last_fetched: Instant,
}

/// Fetches and caches the identity provider's signing keys
pub struct JwksClient {
    issuer_url: String,
    client: reqwest::Client,
    cache: RwLock<Option<JwksCache>>,
    jwks_uri: RwLock<Option<String>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(issuer_url: &str, cache_ttl: Duration) -> Self {
        Self {
            issuer_url: issuer_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
            jwks_uri: RwLock::new(None),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.last_fetched.elapsed() < self.cache_ttl {
                    if let Some(key) = cached.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        // Cache miss or expired (also covers key rotation)
        self.fetch_jwks().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    /// JWKS location from OIDC discovery, falling back to `{issuer}/jwks`
    async fn resolve_jwks_uri(&self) -> String {
        if let Some(uri) = self.jwks_uri.read().await.clone() {
            return uri;
        }

        let discovery_url = format!("{}/.well-known/openid-configuration", self.issuer_url);
        let discovered = match self.client.get(&discovery_url).send().await {
            Ok(response) if response.status().is_success() => response
                .json::<DiscoveryDocument>()
                .await
                .ok()
                .map(|doc| doc.jwks_uri),
            _ => None,
        };

        let uri = discovered.unwrap_or_else(|| {
            tracing::warn!(
                "OIDC discovery unavailable at {}, using {}/jwks",
                discovery_url,
                self.issuer_url
            );
            format!("{}/jwks", self.issuer_url)
        });

        *self.jwks_uri.write().await = Some(uri.clone());
        uri
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        let jwks_url = self.resolve_jwks_uri().await;

        let response = self
            .client
            .get(&jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if jwk.kty != "RSA" {
                continue;
            }
            if let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) {
                let decoding_key = DecodingKey::from_rsa_components(&n, &e)
                    .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
                keys.insert(kid, decoding_key);
            }
        }

        tracing::info!("Loaded {} signing keys from {}", keys.len(), jwks_url);

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}
