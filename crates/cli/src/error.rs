use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Not logged in\nRun `login` before")]
    NotLoggedIn,

    #[error("Invalid input:\n{0}")]
    Invalid(String),
}
