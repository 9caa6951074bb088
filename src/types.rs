use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignUpData {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Which kind of paged listing a `file/list` request targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    File,
    Folder,
}

impl Identifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Identifier::File => "file",
            Identifier::Folder => "folder",
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageData {
    pub page: u32,
    pub path: String,
    /// all / video / photo / pdf / doc, current / download
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordData {
    pub page: u32,
    pub keyword: String,
}

// ============================================================================
// Response shapes
// ============================================================================

/// Session credential triple returned by `auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenData {
    pub username: String,
    pub accesstoken: String,
    pub refreshtoken: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: u64,
    pub file_id: String,
    pub filename: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_like: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<Vec<UserInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderInfo {
    pub path: String,
    pub count: u64,
}

/// One configured remote node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingInfo {
    pub id: u64,
    pub host: String,
    pub port: u16,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// List container returned by the paged endpoints.
///
/// The server answers either `{ "datas": [...], "size": n }` or a bare array;
/// both land here.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Listing<T> {
    pub datas: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            datas: Vec::new(),
            size: None,
        }
    }
}

impl<T> Listing<T> {
    pub fn is_empty(&self) -> bool {
        self.datas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.datas.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingRepr<T> {
    Wrapped {
        #[serde(default = "Vec::new")]
        datas: Vec<T>,
        #[serde(default)]
        size: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<'de, T> Deserialize<'de> for Listing<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ListingRepr::deserialize(deserializer)? {
            ListingRepr::Wrapped { datas, size } => Listing { datas, size },
            ListingRepr::Bare(datas) => Listing { datas, size: None },
        })
    }
}
