use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, verbatim_doc_comment)]
///    ______      __      __           __
///   / ____/___ _/ /_____/ /___ ______/ /_
///  / /   / __ `/ __/ __  / __ `/ ___/ __ \
/// / /___/ /_/ / /_/ /_/ / /_/ (__  ) / / /
/// \____/\__,_/\__/\__,_/\__,_/____/_/ /_/
/// CLI client
pub struct Cli {
    /// Base URL of the API, overrides the settings file
    #[arg(long, env = "CATDASH_API_URL")]
    pub api_url: Option<String>,
    /// Where settings and the session are stored
    #[arg(long, short = 'd', default_value = "./.catdash")]
    pub data_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Log in and remember the token
    Login { email: String, password: String },
    /// Create an account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Tell whether a token is stored
    Status,
    /// Show categories
    List {
        #[arg(long, short, default_value = "all", value_parser = ["all", "active", "inactive"])]
        filter: String,
    },
    /// Create a category
    Create {
        name: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Rename a category and set its active flag
    Update {
        id: String,
        name: String,
        #[arg(long, short)]
        active: bool,
    },
    /// Delete a category
    Delete { id: String },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli_test() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_update_test() {
        let cli = Cli::try_parse_from(["catdash", "--api-url", "http://localhost", "update", "7", "Books", "--active"]).unwrap();

        assert_eq!(Some("http://localhost".to_owned()), cli.api_url);
        assert_eq!(
            Command::Update {
                id: "7".into(),
                name: "Books".into(),
                active: true
            },
            cli.command
        );
    }

    #[test]
    fn parse_list_filter_test() {
        let cli = Cli::try_parse_from(["catdash", "list"]).unwrap();
        assert_eq!(Command::List { filter: "all".into() }, cli.command);

        assert!(Cli::try_parse_from(["catdash", "list", "--filter", "sometimes"]).is_err());
    }
}
