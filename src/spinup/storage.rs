//! Object storage (S3 bucket) wire model

use super::endpoint::{space_path, Endpoint, Params};
use super::flex;
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S3StorageInfo {
    #[serde(rename = "Empty", alias = "empty", default, deserialize_with = "flex::boolean")]
    pub empty: bool,
}

impl S3StorageInfo {
    pub fn state(&self) -> &'static str {
        if self.empty {
            "empty"
        } else {
            "populated"
        }
    }
}

impl Endpoint for S3StorageInfo {
    fn path(params: &Params) -> Result<String> {
        space_path(params, "storage")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessKey {
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub create_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3StorageUser {
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub create_date: String,
    #[serde(default)]
    pub password_last_used: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub access_keys: Vec<AccessKey>,
}

impl Endpoint for S3StorageUser {
    fn path(params: &Params) -> Result<String> {
        Ok(format!(
            "{}/users/{}",
            space_path(params, "storage")?,
            params.segment("user")?
        ))
    }
}

/// User listing; entries carry names only, keys come from the per-user lookup
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct S3StorageUsers(pub Vec<S3StorageUser>);

impl Endpoint for S3StorageUsers {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("{}/users", space_path(params, "storage")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_from_empty_flag() {
        let info: S3StorageInfo = serde_json::from_value(json!({"Empty": true})).unwrap();
        assert_eq!(info.state(), "empty");
        let info: S3StorageInfo = serde_json::from_value(json!({"Empty": false})).unwrap();
        assert_eq!(info.state(), "populated");
    }

    #[test]
    fn test_user_decode() {
        let user: S3StorageUser = serde_json::from_value(json!({
            "UserName": "bucket-rw",
            "CreateDate": "2024-01-01T00:00:00Z",
            "AccessKeys": [{"AccessKeyId": "AKIA1", "Status": "Active"}]
        }))
        .unwrap();
        assert_eq!(user.user_name, "bucket-rw");
        assert_eq!(user.access_keys[0].access_key_id, "AKIA1");
    }

    #[test]
    fn test_endpoints() {
        let p = Params::resource("teamA", "bucket").with("user", "bucket-rw");
        assert_eq!(S3StorageInfo::path(&p).unwrap(), "/spaces/teamA/storage/bucket");
        assert_eq!(S3StorageUsers::path(&p).unwrap(), "/spaces/teamA/storage/bucket/users");
        assert_eq!(
            S3StorageUser::path(&p).unwrap(),
            "/spaces/teamA/storage/bucket/users/bucket-rw"
        );
    }
}
