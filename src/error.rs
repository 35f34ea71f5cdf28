use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request to Steam failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Steam returned invalid JSON: {0}")]
    Json(#[from] json::Error),
    #[error("unexpected Steam response: {0}")]
    Malformed(String),
    #[error("no Steam account matches `{0}`")]
    NoMatch(String),
    #[error("cache database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
