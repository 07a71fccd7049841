use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Session storage persisted as a flat JSON object of string values, the
/// console's equivalent of browser local storage. Writes go through a
/// temporary file and a rename so a crash never leaves half a file behind.
/// On unix the file is readable by its owner only.
pub struct FileSessionRepo {
    path: PathBuf,
    write_lock: Mutex<()>,
}

type Entries = BTreeMap<String, String>;

impl FileSessionRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionRepo {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Entries, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Entries::new()),
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }

    async fn store(&self, entries: &Entries) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load().await?.remove(key))
    }

    async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        f(&mut entries);
        self.store(&entries).await
    }
}

// The mode only applies on creation, so a leftover temp file is removed first.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}

#[async_trait::async_trait]
impl SessionRepo for FileSessionRepo {
    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.get(ACCESS_TOKEN_KEY).await?.map(AccessToken))
    }

    async fn refresh_token(&self) -> Result<Option<RefreshToken>, StoreError> {
        Ok(self.get(REFRESH_TOKEN_KEY).await?.map(RefreshToken))
    }

    async fn user(&self) -> Result<Option<User>, StoreError> {
        self.get(USER_KEY)
            .await?
            .map(|json| serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string())))
            .transpose()
    }

    async fn set_access_token(&self, token: &AccessToken) -> Result<(), StoreError> {
        let value = token.0.clone();
        self.update(move |e| {
            e.insert(ACCESS_TOKEN_KEY.to_string(), value);
        })
        .await
    }

    async fn set_refresh_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let value = token.0.clone();
        self.update(move |e| {
            e.insert(REFRESH_TOKEN_KEY.to_string(), value);
        })
        .await
    }

    async fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string(user).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.update(move |e| {
            e.insert(USER_KEY.to_string(), json);
        })
        .await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.update(|e| {
            for key in SESSION_KEYS {
                e.remove(key);
            }
        })
        .await
    }
}
