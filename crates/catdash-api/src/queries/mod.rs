use serde::{Deserialize, Serialize};

pub mod category;
pub mod user;

/// Most responses wrap the payload into `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Response whose body is not interesting. Also accepts an empty body.
pub type Acknowledged = serde::de::IgnoredAny;
