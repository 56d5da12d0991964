//! Object store writing into a local directory tree
//!
//! Objects land at `{root}/{bucket}/{key}`. Lets the CLI run a batch
//! offline and leave the columnar output on disk for inspection.

use std::path::PathBuf;

use bytes::Bytes;
use contracts::{ContractError, ObjectStore};
use tracing::{debug, instrument};

pub struct DirectoryObjectStore {
    root: PathBuf,
}

impl DirectoryObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Local path an object would be written to
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        for segment in key.split('/').filter(|s| !s.is_empty() && *s != "..") {
            path.push(segment);
        }
        path
    }
}

impl ObjectStore for DirectoryObjectStore {
    #[instrument(
        name = "directory_object_put",
        skip(self, body),
        fields(bucket = %bucket, key = %key, bytes = body.len())
    )]
    async fn put(
        &self,
        region: &str,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<(), ContractError> {
        let path = self.object_path(bucket, key);
        let io_err = |e: std::io::Error| ContractError::object_store(bucket, key, e.to_string());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, &body).await.map_err(io_err)?;

        debug!(region, path = %path.display(), "Object written to disk");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_ignores_traversal() {
        let store = DirectoryObjectStore::new("/out");
        assert_eq!(
            store.object_path("bucket", "logs/../year=2024/m.parquet"),
            PathBuf::from("/out/bucket/logs/year=2024/m.parquet")
        );
    }

    #[tokio::test]
    async fn test_put_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryObjectStore::new(dir.path());

        store
            .put(
                "eu-west-1",
                "archive",
                "logs/year=2024/month=3/day=7/m-1.parquet",
                Bytes::from_static(b"PAR1"),
            )
            .await
            .unwrap();

        let written = std::fs::read(
            dir.path()
                .join("archive/logs/year=2024/month=3/day=7/m-1.parquet"),
        )
        .unwrap();
        assert_eq!(written, b"PAR1");
    }
}
