//! Error types shared by services and HTTP handlers.
//!
//! Services return [`CmsError`]; handlers hand it straight back to axum, which
//! renders it as `{ "statusCode": .., "message": .. }` with the matching HTTP
//! status. Validation failures additionally carry `data.fieldErrors`.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde_json::json;

pub mod validation;

pub use validation::{ValidationError, ValidationErrors};

pub type CmsResult<T> = Result<T, CmsError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CmsErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Unavailable,
    Internal,
}

impl CmsErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CmsErrorKind::NotFound => StatusCode::NOT_FOUND,
            CmsErrorKind::Validation => StatusCode::BAD_REQUEST,
            CmsErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            CmsErrorKind::Unavailable | CmsErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug)]
pub struct CmsError {
    kind: CmsErrorKind,
    message: String,
    field_errors: Option<BTreeMap<String, Vec<String>>>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl CmsError {
    pub fn new(kind: CmsErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: None,
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CmsErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(CmsErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(CmsErrorKind::Unauthorized, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(CmsErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(CmsErrorKind::Internal, message)
    }

    pub fn with_field_errors(mut self, fields: BTreeMap<String, Vec<String>>) -> Self {
        self.field_errors = Some(fields);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> CmsErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        self.field_errors.as_ref()
    }

    /// True for failures caused by the backing store rather than the request.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self.kind, CmsErrorKind::Unavailable | CmsErrorKind::Internal)
    }
}

impl fmt::Display for CmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl StdError for CmsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for CmsError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(ref what) => CmsError::not_found(what.clone()),
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                CmsError::unavailable("Database unavailable").with_source(err)
            }
            _ => CmsError::internal("Database error").with_source(err),
        }
    }
}

impl From<anyhow::Error> for CmsError {
    fn from(err: anyhow::Error) -> Self {
        CmsError::internal("Unhandled error").with_source(AnyhowSource(err))
    }
}

impl From<ValidationErrors> for CmsError {
    fn from(errors: ValidationErrors) -> Self {
        CmsError::validation("Validation Error").with_field_errors(errors.into_field_map())
    }
}

impl From<ValidationError> for CmsError {
    fn from(error: ValidationError) -> Self {
        ValidationErrors::from(error).into()
    }
}

#[derive(Debug)]
struct AnyhowSource(anyhow::Error);

impl fmt::Display for AnyhowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl StdError for AnyhowSource {}

impl IntoResponse for CmsError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!("{}: {}", self.message, source),
                None => tracing::error!("{}", self.message),
            }
        }

        let mut body = json!({
            "statusCode": status.as_u16(),
            "message": self.message,
        });
        if let Some(fields) = self.field_errors {
            body["data"] = json!({ "fieldErrors": fields });
        }

        (status, Json(body)).into_response()
    }
}
