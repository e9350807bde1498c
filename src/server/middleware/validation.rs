use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::{CmsError, ValidationErrors};

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// JSON body extractor that runs [`Validate`] before the handler sees the value.
///
/// Malformed JSON and type mismatches are reported as 400 validation errors
/// rather than axum's default 415/422 plain-text rejections.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = CmsError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> CmsError {
    let mut errors = ValidationErrors::new();
    errors.push(crate::errors::ValidationError::new(rejection.body_text()));
    CmsError::from(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    impl Validate for Named {
        fn validate(&self) -> Result<(), ValidationErrors> {
            let mut errors = ValidationErrors::new();
            if self.name.is_empty() {
                errors.add("name", "Name is required");
            }
            errors.into_result()
        }
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(named) = ValidatedJson::<Named>::from_request(request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(named.name, "x");
    }

    #[tokio::test]
    async fn rejects_invalid_and_malformed_bodies() {
        let err = ValidatedJson::<Named>::from_request(request(r#"{"name":""}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.field_errors().unwrap()["name"], vec!["Name is required"]);

        let err = ValidatedJson::<Named>::from_request(request("{"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
