#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod paths;
pub mod service;
pub mod session;
pub mod store;

pub mod error;

pub mod fs;

pub mod consts;

pub use catdash_api as api;
pub use consts::*;
