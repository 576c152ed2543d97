use super::model::AuthenticatedUser;
use crate::core::error::AppError;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::jwks::JwksClient;

pub struct JwtValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    leeway: u64,
    roles_claim: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    // Standard claims; iss/aud/exp/nbf are checked by jsonwebtoken
    sub: String,
    #[serde(default)]
    email: Option<String>,

    // Everything else, including the provider-specific roles claim
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// Read roles from the configured claim.
///
/// Accepts either a plain string array (`"roles": ["admin"]`) or a namespaced
/// object carrying a `roles` array (`"https://example.com/claims": {"roles": [...]}`).
fn extract_roles(extra: &HashMap<String, Value>, claim: &str) -> Vec<String> {
    let roles_value = match extra.get(claim) {
        Some(Value::Object(map)) => map.get("roles"),
        other => other,
    };

    match roles_value {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

impl JwtValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        leeway: Duration,
        roles_claim: String,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            leeway: leeway.as_secs(),
            roles_claim,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}. Only RS256 is allowed",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;

        let decoding_key = self
            .jwks_client
            .get_key(&kid)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?
            .claims;

        let roles = extract_roles(&claims.extra, &self.roles_claim);

        Ok(AuthenticatedUser {
            sub: claims.sub,
            email: claims.email,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_roles_from_plain_array() {
        let extra = claims(json!({ "roles": ["admin", "editor"] }));
        assert_eq!(extract_roles(&extra, "roles"), vec!["admin", "editor"]);
    }

    #[test]
    fn test_extract_roles_from_namespaced_object() {
        let extra = claims(json!({
            "https://linkhub.example/claims": { "roles": ["admin"], "type": "global" }
        }));
        assert_eq!(
            extract_roles(&extra, "https://linkhub.example/claims"),
            vec!["admin"]
        );
    }

    #[test]
    fn test_extract_roles_missing_or_malformed() {
        let extra = claims(json!({ "roles": "admin", "other": [1, 2] }));
        assert!(extract_roles(&extra, "roles").is_empty());
        assert!(extract_roles(&extra, "missing").is_empty());
    }
}
