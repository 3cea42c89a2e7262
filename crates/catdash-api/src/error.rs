use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Path: {path}. Error: {message}")]
    Decode { path: String, message: String },

    #[error("This request requires a token")]
    MissingToken,
}

impl ApiError {
    /// Build a [`ApiError::Status`] using whatever explanation the server sent.
    ///
    /// Looks at `message` first, then `errors` (a string or a list of strings),
    /// then falls back to the raw body or the status' reason phrase.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| extract_message(&value))
            .or_else(|| {
                let body = body.trim();
                (!body.is_empty()).then(|| body.chars().take(200).collect())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_owned());

        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return Some(message.to_owned());
    }

    match value.get("errors")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let iter = items.iter().map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
            Some(itertools::intersperse(iter, ", ".to_owned()).collect::<String>())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(error: ApiError) -> String {
        match error {
            ApiError::Status { message, .. } => message,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn message_field_test() {
        let e = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"message": "Invalid email"}"#);
        assert_eq!("Invalid email", message(e));
    }

    #[test]
    fn errors_list_test() {
        let e = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors": ["name is required", "email is required"]}"#,
        );
        assert_eq!("name is required, email is required", message(e));
    }

    #[test]
    fn fallback_test() {
        let e = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert_eq!("Not Found", message(e));

        let e = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!("upstream down", message(e));
    }

    #[test]
    fn unauthorized_test() {
        let e = ApiError::from_response(StatusCode::UNAUTHORIZED, "{}");
        assert!(e.is_unauthorized());
        assert!(!ApiError::MissingToken.is_unauthorized());
    }
}
