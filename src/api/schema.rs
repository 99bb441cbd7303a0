// Request/response payloads and their validation rules

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::IssuedToken;
use crate::database::{AssetChanges, NewAsset};
use crate::error::ApiError;

/// Normalize a deserialized payload in place and reject invalid values
pub trait Validate {
    fn validate(&mut self) -> Result<(), ApiError>;
}

#[derive(Debug, Default)]
struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid request payload", Some(self.0)))
        }
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        trim_in_place(v);
    }
}

fn check_value(errors: &mut FieldErrors, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.add("value", "Must be a number greater than or equal to 0");
        }
    }
}

/// Login body. Both fields are trimmed before they are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

impl Validate for TokenRequest {
    fn validate(&mut self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::default();
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.password);
        if self.username.is_empty() {
            errors.add("username", "This field is required");
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(token: IssuedToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "bearer".to_string(),
            expires_in: token.expires_in,
        }
    }
}

impl Validate for NewAsset {
    fn validate(&mut self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::default();

        trim_in_place(&mut self.name);
        trim_optional(&mut self.category);
        trim_optional(&mut self.owner);
        trim_optional(&mut self.status);
        trim_optional(&mut self.location);
        trim_optional(&mut self.metadata);

        if self.name.is_empty() {
            errors.add("name", "This field is required");
        }
        check_value(&mut errors, self.value);
        errors.into_result()
    }
}

impl Validate for AssetChanges {
    fn validate(&mut self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::validation_error(
                "At least one field must be provided for update.",
                None,
            ));
        }

        let mut errors = FieldErrors::default();

        if let Some(name) = self.name.as_mut() {
            trim_in_place(name);
            if name.is_empty() {
                errors.add("name", "Must not be empty");
            }
        }
        trim_optional(&mut self.category);
        trim_optional(&mut self.owner);
        trim_optional(&mut self.status);
        trim_optional(&mut self.location);
        trim_optional(&mut self.metadata);

        check_value(&mut errors, self.value);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError {
                field_errors: Some(errors),
                ..
            } => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[test]
    fn new_asset_is_trimmed() {
        let mut asset: NewAsset = serde_json::from_value(json!({
            "name": "  Oscilloscope ",
            "location": " Lab 3 ",
            "value": 0
        }))
        .unwrap();
        asset.validate().unwrap();

        assert_eq!(asset.name, "Oscilloscope");
        assert_eq!(asset.location.as_deref(), Some("Lab 3"));
        assert_eq!(asset.value, Some(0.0));
    }

    #[test]
    fn new_asset_requires_name_and_non_negative_value() {
        let mut asset: NewAsset =
            serde_json::from_value(json!({ "name": "   ", "value": -1.0 })).unwrap();
        let errors = field_errors(asset.validate().unwrap_err());

        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("value"));
    }

    #[test]
    fn new_asset_rejects_unknown_and_mistyped_fields() {
        assert!(serde_json::from_value::<NewAsset>(json!({ "name": "x", "colour": "red" })).is_err());
        assert!(serde_json::from_value::<NewAsset>(json!({ "category": "IT" })).is_err());
        assert!(serde_json::from_value::<NewAsset>(json!({ "name": "x", "value": "cheap" })).is_err());
        assert!(
            serde_json::from_value::<NewAsset>(json!({ "name": "x", "purchase_date": "17/05/2023" }))
                .is_err()
        );
    }

    #[test]
    fn empty_update_is_rejected() {
        let mut changes: AssetChanges = serde_json::from_value(json!({})).unwrap();
        let err = changes.validate().unwrap_err();
        assert_eq!(err.message(), "At least one field must be provided for update.");

        let mut nulls: AssetChanges =
            serde_json::from_value(json!({ "name": null, "value": null })).unwrap();
        assert!(nulls.validate().is_err());
    }

    #[test]
    fn update_rejects_blank_name() {
        let mut changes: AssetChanges = serde_json::from_value(json!({ "name": "  " })).unwrap();
        let errors = field_errors(changes.validate().unwrap_err());
        assert!(errors.contains_key("name"));
    }

    #[test]
    fn token_request_requires_both_fields() {
        let mut request: TokenRequest =
            serde_json::from_value(json!({ "username": " ", "password": "   " })).unwrap();
        let errors = field_errors(request.validate().unwrap_err());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn token_request_trims_both_fields() {
        let mut request: TokenRequest =
            serde_json::from_value(json!({ "username": " admin ", "password": "\tpassword " }))
                .unwrap();
        request.validate().unwrap();

        assert_eq!(request.username, "admin");
        assert_eq!(request.password, "password");
    }

    #[test]
    fn token_response_is_bearer() {
        let response = TokenResponse::from(IssuedToken {
            access_token: "abc".to_string(),
            expires_in: 86_400,
        });
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_in, 86_400);
    }
}
