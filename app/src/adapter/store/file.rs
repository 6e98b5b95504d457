use std::path::PathBuf;

use anyhow::Context as _;

use crate::port::KeyValueStore;

/// One JSON file per key inside a directory. No expiry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_of(key);

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Error reading cache file {}", path.display())),
        }
    }

    //write-then-rename, readers never see a half written file
    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Error creating cache directory {}", self.dir.display()))?;

        let path = self.path_of(key);
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));

        tokio::fs::write(&tmp_path, value)
            .await
            .with_context(|| format!("Error writing cache file {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Error replacing cache file {}", path.display()))
    }

    fn storage_name(&self) -> &'static str {
        "File"
    }
}
