//! Login and registration

use reqwest::Method;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{Builder, QueryData};

#[derive(Debug, Clone, Serialize, TypedBuilder)]
pub struct LoginData {
    #[builder(setter(into))]
    pub email: String,
    #[builder(setter(into))]
    pub password: String,
}

/// Successful login.
///
/// The token is usually top-level but some deployments put it under `data`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "LoginRepr")]
pub struct Login {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginRepr {
    Flat { token: String },
    Wrapped { data: TokenHolder },
}

#[derive(Deserialize)]
struct TokenHolder {
    token: String,
}

impl From<LoginRepr> for Login {
    fn from(value: LoginRepr) -> Self {
        let token = match value {
            LoginRepr::Flat { token } | LoginRepr::Wrapped { data: TokenHolder { token } } => token,
        };
        Self { token }
    }
}

impl QueryData<Login> for LoginData {
    fn method(&self) -> Method {
        Method::POST
    }

    fn builder(&self) -> Builder {
        Builder::new("api/user/login")
    }

    fn body(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "email": self.email,
            "password": self.password,
        }))
    }

    fn requires_auth(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize, TypedBuilder)]
pub struct RegisterData {
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub email: String,
    #[builder(setter(into))]
    pub password: String,
}

/// Whatever the server sends back after creating the account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registered {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl QueryData<Registered> for RegisterData {
    fn method(&self) -> Method {
        Method::POST
    }

    fn builder(&self) -> Builder {
        Builder::new("api/user/register")
    }

    fn body(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "name": self.name,
            "email": self.email,
            "password": self.password,
        }))
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
