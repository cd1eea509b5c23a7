//! `version`

use serde::Serialize;

/// Version injected at compile time via SPINUP_VERSION (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("SPINUP_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

pub const GIT_HASH: &str = match option_env!("SPINUP_GIT_HASH") {
    Some(v) => v,
    None => "unknown",
};

pub const BUILD_STAMP: &str = match option_env!("SPINUP_BUILD_STAMP") {
    Some(v) => v,
    None => "unknown",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_stamp: &'static str,
}

pub fn info() -> VersionInfo {
    VersionInfo {
        version: VERSION,
        git_hash: GIT_HASH,
        build_stamp: BUILD_STAMP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_keys() {
        let out = serde_json::to_value(info()).unwrap();
        assert!(out["version"].is_string());
        assert!(out.get("gitHash").is_some());
        assert!(out.get("buildStamp").is_some());
    }
}
