use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("either user or org is required")]
    NoOwner,
    #[error("no commits in repository: '{0}'")]
    NoCommits(String),
    #[error("request timed out: '{0}'")]
    Timeout(String),
    #[error("github api error: '{0}'")]
    Octocrab(#[from] Box<octocrab::Error>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// `octocrab::Error` is large, keep `Error` small by boxing it
impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Error::Octocrab(Box::new(e))
    }
}
