use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// The whole document `D` lives in one file. Nothing is cached: every call
/// re-reads the file, and every mutation rewrites it in full. The lock is the
/// transaction boundary:
/// - [`read`](Self::read) holds the shared lock while loading,
/// - [`update`](Self::update) holds the exclusive lock across load, mutate and write.
///
/// Writes go straight to the target file (no temp file + rename), so a crash
/// mid-write can leave a truncated document behind.
pub struct JsonDocumentStore<D> {
    lock: RwLock<()>,
    file_path: PathBuf,
    _doc: PhantomData<fn() -> D>,
}

impl<D> JsonDocumentStore<D>
where
    D: Serialize + DeserializeOwned + Default,
{
    /// Open the store at `path`, creating the parent directory and an empty
    /// document if the file is missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }

        if fs::metadata(&file_path).await.is_err() {
            let empty = serde_json::to_vec(&D::default()).map_err(ServiceError::storage)?;
            fs::write(&file_path, empty).await.map_err(ServiceError::storage)?;
            info!(path = %file_path.display(), "created empty store document");
        }

        Ok(Arc::new(Self { lock: RwLock::new(()), file_path, _doc: PhantomData }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn load(&self) -> Result<D, ServiceError> {
        let bytes = fs::read(&self.file_path).await.map_err(ServiceError::storage)?;
        serde_json::from_slice(&bytes).map_err(ServiceError::storage)
    }

    async fn save(&self, doc: &D) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(doc).map_err(ServiceError::storage)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::storage)?;
        Ok(())
    }

    /// Load the document under the shared lock and project a value out of it.
    pub async fn read<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&D) -> Result<T, ServiceError>,
    {
        let _guard = self.lock.read().await;
        let doc = self.load().await?;
        f(&doc)
    }

    /// Load, mutate and persist the document under the exclusive lock.
    ///
    /// If `f` fails the file is left untouched.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use service::storage::json_document_store::JsonDocumentStore;
    ///
    /// let path = std::env::temp_dir().join("json_document_store_doc.json");
    /// tokio_test::block_on(async {
    ///     let store = JsonDocumentStore::<BTreeMap<String, u32>>::open(&path).await.unwrap();
    ///     store.update(|d| { d.insert("hits".into(), 1); Ok(()) }).await.unwrap();
    ///     assert_eq!(store.read(|d| Ok(d.get("hits").copied())).await.unwrap(), Some(1));
    /// });
    /// # let _ = std::fs::remove_file(&path);
    /// ```
    pub async fn update<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut D) -> Result<T, ServiceError>,
    {
        // 写锁覆盖 读取 -> 修改 -> 写回 全过程
        let _guard = self.lock.write().await;
        let mut doc = self.load().await?;
        // 闭包失败时直接返回，不写文件
        let out = f(&mut doc)?;
        self.save(&doc).await?;
        debug!(path = %self.file_path.display(), "store document written");
        Ok(out)
    }
}
