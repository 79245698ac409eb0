use std::path::PathBuf;

use serde::Deserialize;

/// Which object store implementation to use.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Connection settings for an S3-compatible backend.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    /// Bucket holding every namespace's objects.
    pub bucket: String,
    /// Region name. Default: "us-east-1".
    #[serde(default = "default_s3_region")]
    pub region: String,
    /// Custom endpoint (MinIO, Ceph, ...). Defaults to the AWS endpoint for `region`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Use path-style addressing. Default: true.
    #[serde(default = "default_s3_path_style")]
    pub path_style: bool,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}
fn default_s3_path_style() -> bool {
    true
}

/// App-level object storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Backend selection. Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend. Default: "./data/objects".
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Required when `backend = "s3"`.
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/objects")
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            s3: None,
        }
    }
}
