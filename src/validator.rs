//! Form extraction with validation.
//!
//! [`ValidatedForm`] decodes an `application/x-www-form-urlencoded` body and
//! runs its `validator` rules. Failures surface as [`FormErrors`], which
//! handlers usually take as `Result<ValidatedForm<T>, FormErrors>` so they can
//! re-render the page instead of returning an error response.

use axum::{
    Form,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

/// Human-readable reasons a form was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub String);

impl IntoResponse for FormErrors {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self.0).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedForm<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = FormErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| FormErrors(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| FormErrors(format_errors(&errors)))?;

        Ok(ValidatedForm(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Credentials {
        #[serde(default)]
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
        #[serde(default)]
        #[validate(length(min = 1, message = "Password is required"))]
        password: String,
    }

    fn form_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_form_is_extracted() {
        let ValidatedForm(creds) =
            ValidatedForm::<Credentials>::from_request(form_request("username=ana&password=pw"), &())
                .await
                .unwrap();
        assert_eq!(creds.username, "ana");
        assert_eq!(creds.password, "pw");
    }

    #[tokio::test]
    async fn test_empty_fields_are_reported() {
        let err = ValidatedForm::<Credentials>::from_request(form_request("username="), &())
            .await
            .unwrap_err();
        assert_eq!(err.0, "Password is required, Username is required");
    }
}
