use std::fmt;

use clap::Parser;

use crate::error::Error;
use crate::filter::Owner;
use crate::selection;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Options {
    #[arg(long, default_value = "", help = "github username")]
    pub user: String,
    #[arg(long, default_value = "", help = "github password or access token")]
    pub pass: String,
    #[arg(long, default_value_t = 8080, help = "port to listen on")]
    pub port: u16,
    #[arg(
        long,
        default_value = "",
        help = "organization to pull repos from, blank for your own"
    )]
    pub org: String,
    #[arg(
        long,
        default_value = "",
        help = "topics (csv) to include from repo list, any match includes the repo"
    )]
    pub topics: String,
    #[arg(
        long,
        default_value = "",
        help = "repositories (csv) to look at for check-run status"
    )]
    pub include: String,
    #[arg(
        long,
        default_value = "",
        help = "repositories (csv) to exclude, takes precedence over include and topics"
    )]
    pub exclude: String,
    #[arg(
        long,
        default_value = "200px",
        help = "min-width style of a status tile"
    )]
    pub width: String,
    #[arg(
        long,
        default_value_t = 10,
        help = "timeout of a single api request in seconds"
    )]
    pub timeout: u64,
    #[arg(
        long,
        default_value = "https://api.github.com",
        help = "base url of the github api"
    )]
    pub api_base: String,
    #[arg(
        long = "check-run",
        value_enum,
        default_value_t = selection::Strategy::First,
        help = "how to pick the check-run representing a commit"
    )]
    pub strategy: selection::Strategy,
}

impl Options {
    /// An organization takes precedence, the user is also used as credential
    pub fn owner(&self) -> Result<Owner, Error> {
        if !self.org.is_empty() {
            Ok(Owner::Organization(self.org.clone()))
        } else if !self.user.is_empty() {
            Ok(Owner::User(self.user.clone()))
        } else {
            Err(Error::NoOwner)
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.user.is_empty() && !self.pass.is_empty() {
            Some((&self.user, &self.pass))
        } else {
            None
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pass = if self.pass.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Options")
            .field("user", &self.user)
            .field("pass", &pass)
            .field("port", &self.port)
            .field("org", &self.org)
            .field("topics", &self.topics)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("width", &self.width)
            .field("timeout", &self.timeout)
            .field("api_base", &self.api_base)
            .field("strategy", &self.strategy)
            .finish()
    }
}
