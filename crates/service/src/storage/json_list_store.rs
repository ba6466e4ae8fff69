use std::{ffi::OsString, io, marker::PhantomData, path::{Path, PathBuf}};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::{Action, ServiceError};

pub use configs::{ReadMode, WriteMode};

/// Generic JSON file-backed list store.
///
/// The file holds one pretty-printed JSON array. Nothing is cached: every
/// `load` reads the whole file and every `save` rewrites it.
#[derive(Debug, Clone)]
pub struct JsonListStore<T> {
    file_path: PathBuf,
    read_mode: ReadMode,
    write_mode: WriteMode,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P, read_mode: ReadMode, write_mode: WriteMode) -> Self {
        Self { file_path: path.into(), read_mode, write_mode, _item: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and decode the whole list. `action` labels any error raised.
    pub async fn load(&self, action: Action) -> Result<Vec<T>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "backing file missing; treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(ServiceError::Io { action, source }),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(items) => {
                debug!(path = %self.file_path.display(), count = items.len(), "loaded backing file");
                Ok(items)
            }
            Err(source) => match self.read_mode {
                ReadMode::Lenient => {
                    warn!(path = %self.file_path.display(), error = %source, "backing file unreadable; treating as empty");
                    Ok(Vec::new())
                }
                ReadMode::Strict => Err(ServiceError::Parse { action, source }),
            },
        }
    }

    /// Encode and write the whole list.
    pub async fn save(&self, items: &[T], action: Action) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|source| ServiceError::Serialize { action, source })?;
        let written = match self.write_mode {
            WriteMode::InPlace => fs::write(&self.file_path, &data).await,
            WriteMode::Atomic => self.replace(&data).await,
        };
        written.map_err(|source| ServiceError::Io { action, source })?;
        debug!(path = %self.file_path.display(), count = items.len(), bytes = data.len(), "rewrote backing file");
        Ok(())
    }

    async fn replace(&self, data: &[u8]) -> io::Result<()> {
        let tmp = self.tmp_path();
        fs::write(&tmp, data).await?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.file_path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tmp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("json_list_store_{tag}_{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_and_blank_files_load_empty() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("blank");
        let store = JsonListStore::<u32>::new(&tmp, ReadMode::Strict, WriteMode::InPlace);
        assert!(store.load(Action::Listing).await?.is_empty());

        tokio::fs::write(&tmp, " \n\t").await?;
        assert!(store.load(Action::Listing).await?.is_empty());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_depends_on_read_mode() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("corrupt");
        tokio::fs::write(&tmp, "[1, 2,").await?;

        let lenient = JsonListStore::<u32>::new(&tmp, ReadMode::Lenient, WriteMode::InPlace);
        assert!(lenient.load(Action::Listing).await?.is_empty());

        let strict = JsonListStore::<u32>::new(&tmp, ReadMode::Strict, WriteMode::InPlace);
        let err = strict.load(Action::Fetching).await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse { action: Action::Fetching, .. }));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn directory_path_is_an_io_fault() {
        let dir = std::env::temp_dir();
        let store = JsonListStore::<u32>::new(&dir, ReadMode::Lenient, WriteMode::InPlace);
        let err = store.load(Action::Fetching).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io { action: Action::Fetching, .. }));
    }

    #[tokio::test]
    async fn save_writes_two_space_pretty_array() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("pretty");
        let store = JsonListStore::<u32>::new(&tmp, ReadMode::Lenient, WriteMode::InPlace);
        store.save(&[1, 2], Action::Adding).await?;

        let text = tokio::fs::read_to_string(&tmp).await?;
        assert_eq!(text, "[\n  1,\n  2\n]");
        assert_eq!(store.load(Action::Listing).await?, vec![1, 2]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn atomic_save_leaves_no_temp_file() -> Result<(), anyhow::Error> {
        let tmp = tmp_file("atomic");
        let store = JsonListStore::<u32>::new(&tmp, ReadMode::Lenient, WriteMode::Atomic);
        store.save(&[7], Action::Adding).await?;
        store.save(&[7, 8], Action::Adding).await?;

        assert_eq!(store.load(Action::Listing).await?, vec![7, 8]);
        assert!(tokio::fs::metadata(store.tmp_path()).await.is_err());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
