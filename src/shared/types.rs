use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PARTIAL UPDATES
// =============================================================================

/// Deserializer for clearable fields in update DTOs.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an `Option<Option<T>>`:
/// a missing field stays `None` (unchanged), `null` becomes `Some(None)` (clear),
/// and a value becomes `Some(Some(v))` (set).
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a clearable patch value onto a field
pub fn apply_nullable<T>(target: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        description: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_missing_null_and_value() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.description, None);

        let cleared: Patch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: Patch = serde_json::from_str(r#"{"description": "hi"}"#).unwrap();
        assert_eq!(set.description, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_apply_nullable() {
        let mut field = Some("old".to_string());
        apply_nullable(&mut field, None);
        assert_eq!(field.as_deref(), Some("old"));

        apply_nullable(&mut field, Some(Some("new".to_string())));
        assert_eq!(field.as_deref(), Some("new"));

        apply_nullable(&mut field, Some(None));
        assert!(field.is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ApiResponse::<()>::error(Some("nope".to_string()), None);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "nope");
        assert!(json["data"].is_null());
    }
}
