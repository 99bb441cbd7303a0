use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::schema::Validate;
use crate::error::ApiError;

/// JSON body that has been deserialized, normalized and validated.
///
/// Every rejection is reported as a 400 in the API's error format.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;
        Ok(Self(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let mut field_errors = HashMap::new();
            field_errors.insert("body".to_string(), err.body_text());
            ApiError::validation_error("Invalid request payload", Some(field_errors))
        }
        other => {
            tracing::debug!(rejection = %other.body_text(), "unreadable request body");
            ApiError::invalid_json("Request body must be valid JSON.")
        }
    }
}
