//! Command implementations
//!
//! Each command takes an open [`Session`] and returns the JSON document to
//! print; `main` owns rendering and the exit code.

pub mod configure;
pub mod get;
pub mod list;
pub mod update;
pub mod version;

use crate::config::Config;
use crate::error::{Result, SpinupError};
use crate::spinup::SpinupClient;

/// An authenticated client plus the configuration it was built from
pub struct Session {
    pub client: SpinupClient,
    pub config: Config,
}

impl Session {
    /// Build a client from `config`, validating the token or logging in with
    /// username and password when no token is set
    pub async fn connect(config: Config) -> Result<Self> {
        let client = SpinupClient::new(config.effective_url()?, config.token.clone())?;
        client.validate_token()?;

        if !client.has_token() {
            match config.credentials() {
                Some((username, password)) => {
                    tracing::info!("no token configured, logging in as {}", username);
                    client
                        .login(config.effective_cas_url(), username, password)
                        .await?;
                }
                None => tracing::warn!("no token or credentials configured"),
            }
        }

        Ok(Self { client, config })
    }

    pub fn default_spaces(&self) -> &[String] {
        &self.config.spaces
    }

    /// Spaces named on the command line, else the default spaces
    pub fn spaces_or_default(&self, args: &[String]) -> Result<Vec<String>> {
        spaces_or_default(args, self.default_spaces())
    }
}

pub fn spaces_or_default(args: &[String], defaults: &[String]) -> Result<Vec<String>> {
    let spaces: Vec<String> = if args.is_empty() {
        defaults.to_vec()
    } else {
        args.to_vec()
    };
    if spaces.is_empty() {
        return Err(SpinupError::input("space required"));
    }
    Ok(spaces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_fallback() {
        let defaults = vec!["teamA".to_string()];
        assert_eq!(spaces_or_default(&[], &defaults).unwrap(), vec!["teamA"]);
        assert_eq!(
            spaces_or_default(&["teamB".to_string()], &defaults).unwrap(),
            vec!["teamB"]
        );
        let err = spaces_or_default(&[], &[]).unwrap_err();
        assert!(err.is_input());
        assert_eq!(err.to_string(), "space required");
    }

    #[tokio::test]
    async fn test_connect_requires_url() {
        let err = Session::connect(Config::default()).await.err().unwrap();
        assert!(matches!(err, SpinupError::Config(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_token() {
        let config = Config {
            url: Some("http://127.0.0.1:9".to_string()),
            token: Some("not-a-jwt".to_string()),
            ..Default::default()
        };
        let err = Session::connect(config).await.err().unwrap();
        assert!(matches!(err, SpinupError::Auth(_)));
    }
}
