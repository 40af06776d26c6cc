//! Conversion of request validation failures into `invalid_request` errors.
//!
//! Every error carries `details.field` and `details.code` so clients can
//! point at the offending input.

use pagination::{Page, PageError, PageParams};
use serde_json::json;

use crate::domain::{
    Email, Error, LoginValidationError, Password, TodoTitle, TodoValidationError,
    UserValidationError,
};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const TITLE: FieldName = FieldName::new("title");

/// Build an `invalid_request` error pointing at `field`.
pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn email_error(err: &UserValidationError) -> Error {
    field_error(EMAIL, err.code(), err.to_string())
}

pub(crate) fn title_error(err: &TodoValidationError) -> Error {
    field_error(TITLE, err.code(), err.to_string())
}

/// Password and username failures share one error type; route each to the
/// field it describes.
pub(crate) fn login_error(err: &LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => USERNAME,
        LoginValidationError::EmptyPassword | LoginValidationError::PasswordTooShort { .. } => {
            PASSWORD
        }
    };
    field_error(field, err.code(), err.to_string())
}

fn page_error(err: &PageError) -> Error {
    let code = match err {
        PageError::NegativeSkip { .. } => "negative_skip",
        PageError::NegativeLimit { .. } => "negative_limit",
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

pub(crate) fn parse_email(raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| email_error(&err))
}

pub(crate) fn parse_password(raw: &str) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| login_error(&err))
}

pub(crate) fn parse_title(raw: &str) -> Result<TodoTitle, Error> {
    TodoTitle::new(raw).map_err(|err| title_error(&err))
}

pub(crate) fn parse_page(params: PageParams) -> Result<Page, Error> {
    Page::try_from(params).map_err(|err| page_error(&err))
}
