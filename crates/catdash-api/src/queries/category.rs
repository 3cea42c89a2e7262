//! Categories

use std::{fmt::Display, ops::Deref};

use reqwest::Method;
use serde::{de::Visitor, Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{Acknowledged, Builder, Envelope, QueryData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Category identifier. Serialized as a string, accepts numbers too.
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Deref for CategoryId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

struct CategoryIdVisitor;

impl<'de> Visitor<'de> for CategoryIdVisitor {
    type Value = CategoryId;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("string or integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(CategoryId(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(CategoryId(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(CategoryId(v.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(CategoryId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(CategoryIdVisitor)
    }
}

pub type Categories = Vec<Category>;

/// There's no data to be passed.
pub struct CategoriesData;

impl QueryData<Envelope<Categories>> for CategoriesData {
    fn builder(&self) -> Builder {
        Builder::new("api/category/")
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateCategoryData {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
}

impl QueryData<Envelope<Category>> for CreateCategoryData {
    fn method(&self) -> Method {
        Method::POST
    }

    fn builder(&self) -> Builder {
        Builder::new("api/category/create/")
    }

    fn body(&self) -> Option<serde_json::Value> {
        let mut body = serde_json::json!({ "name": self.name });
        if let Some(description) = &self.description {
            body["description"] = serde_json::Value::String(description.clone());
        }
        Some(body)
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct UpdateCategoryData {
    #[builder(setter(into))]
    pub id: CategoryId,
    #[builder(setter(into))]
    pub name: String,
    pub is_active: bool,
}

impl QueryData<Acknowledged> for UpdateCategoryData {
    fn method(&self) -> Method {
        Method::PUT
    }

    fn builder(&self) -> Builder {
        Builder::new("api/category/update")
    }

    fn body(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "id": self.id,
            "name": self.name,
            "is_active": self.is_active,
        }))
    }
}

pub struct DeleteCategoryData {
    id: CategoryId,
}

impl DeleteCategoryData {
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self { id: id.into() }
    }
}

impl QueryData<Acknowledged> for DeleteCategoryData {
    fn method(&self) -> Method {
        Method::DELETE
    }

    fn builder(&self) -> Builder {
        Builder::new("api/category")
            .add_segment(&*self.id)
            .trailing_slash()
    }
}
