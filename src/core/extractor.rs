use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::core::error::AppError;

/// JSON body that is deserialized and then checked with `validator`.
///
/// Malformed bodies become `BadRequest`, failed rules become `Validation`
/// with one message per broken rule.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_failure)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => {
            format!("Invalid JSON syntax: {}", err.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => format!("Failed to read JSON body: {}", other.body_text()),
    };
    AppError::BadRequest(message)
}

fn validation_failure(errors: ValidationErrors) -> AppError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| match &failure.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    AppError::Validation(messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Deserialize, Validate)]
    struct Note {
        #[validate(length(min = 1, message = "Text is required"))]
        text: String,
    }

    async fn echo(ValidatedJson(note): ValidatedJson<Note>) -> String {
        note.text
    }

    fn server() -> TestServer {
        TestServer::new(Router::new().route("/notes", post(echo))).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let response = server().post("/notes").json(&json!({"text": "hi"})).await;
        response.assert_status_ok();
        response.assert_text("hi");
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error() {
        let response = server()
            .post("/notes")
            .json(&json!({"text": ""}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Text is required");
        assert_eq!(body["errors"][0], "Text is required");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = server()
            .post("/notes")
            .json(&json!({"body": 3}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON data"));
        assert_eq!(body["errors"], Value::Null);
    }
}
