//! Identifier resolution
//!
//! A resource is named on the command line either as `space/name` or as a
//! bare `name`. Bare names are looked up in the configured default spaces,
//! in order; the first space holding a resource of that name wins.

use crate::error::{Result, SpinupError};
use crate::spinup::SpinupClient;

/// A concrete resource address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub space: String,
    pub name: String,
}

impl ResourceRef {
    pub fn new(space: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.space, self.name)
    }
}

/// A parsed command-line identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Qualified(ResourceRef),
    Bare(String),
}

pub fn parse_identifier(token: &str) -> Result<Identifier> {
    let parts: Vec<&str> = token.split('/').collect();
    match parts.as_slice() {
        [name] if !name.is_empty() => Ok(Identifier::Bare(name.to_string())),
        [space, name] if !space.is_empty() && !name.is_empty() => {
            Ok(Identifier::Qualified(ResourceRef::new(*space, *name)))
        }
        _ => Err(SpinupError::input("space/resource required")),
    }
}

/// Resolve `token` to a concrete address, searching `default_spaces` for bare names.
pub async fn resolve(
    client: &SpinupClient,
    token: &str,
    default_spaces: &[String],
) -> Result<ResourceRef> {
    let name = match parse_identifier(token)? {
        Identifier::Qualified(r) => return Ok(r),
        Identifier::Bare(name) => name,
    };

    if default_spaces.is_empty() {
        return Err(SpinupError::input("no default spaces configured"));
    }

    for space in default_spaces {
        tracing::debug!("looking for {} in space {}", name, space);
        let resources = client.resources(space).await?;
        if resources.iter().any(|r| r.name == name) {
            tracing::info!("resolved {} to {}/{}", name, space, name);
            return Ok(ResourceRef::new(space.as_str(), name));
        }
    }

    Err(SpinupError::NotFound(format!(
        "resource {} not found in spaces: {}",
        name,
        default_spaces.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        assert_eq!(
            parse_identifier("teamA/web").unwrap(),
            Identifier::Qualified(ResourceRef::new("teamA", "web"))
        );
    }

    #[test]
    fn test_parse_bare() {
        assert_eq!(
            parse_identifier("web").unwrap(),
            Identifier::Bare("web".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for token in ["", "a/b/c", "/web", "teamA/", "/"] {
            let err = parse_identifier(token).unwrap_err();
            assert!(err.is_input(), "{:?} should be an input error", token);
        }
    }

    #[tokio::test]
    async fn test_bare_name_without_defaults_is_input_error() {
        let client = SpinupClient::new("http://127.0.0.1:9", None).unwrap();
        let err = resolve(&client, "web", &[]).await.unwrap_err();
        assert!(err.is_input());
        assert_eq!(err.to_string(), "no default spaces configured");
    }

    #[test]
    fn test_qualified_skips_network() {
        // port 9 is discard; a network call would fail
        let client = SpinupClient::new("http://127.0.0.1:9", None).unwrap();
        let r = tokio_test::block_on(resolve(&client, "teamA/web", &["teamB".to_string()]))
            .unwrap();
        assert_eq!(r.to_string(), "teamA/web");
    }
}
