use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic key-value document map, optionally persisted to a JSON file.
///
/// Backs the `file://` and `memory://` storage backends: every collection is
/// a `HashMap<K, V>` guarded by an async lock. With a file path, each write
/// rewrites the file; without one, data lives as long as the process.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
    file_path: Option<PathBuf>,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", parent.display())))?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("corrupt data file {}: {e}", file_path.display()))
            })?,
            Err(_) => {
                let empty: HashMap<K, V> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?)
                    .await
                    .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path: Some(file_path) }))
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self { inner: Arc::new(RwLock::new(HashMap::new())), file_path: None })
    }

    async fn save(&self, map: &HashMap<K, V>) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let data = serde_json::to_vec(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// List all values.
    pub async fn values(&self) -> Vec<V> {
        let map = self.inner.read().await;
        map.values().cloned().collect()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value by key and persist.
    /// On a failed write the previous entry is restored.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let previous = map.insert(key.clone(), value);
        if let Err(e) = self.save(&map).await {
            match previous {
                Some(v) => { map.insert(key, v); }
                None => { map.remove(&key); }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let Some(previous) = map.remove(key) else { return Ok(false) };
        if let Err(e) = self.save(&map).await {
            map.insert(key.clone(), previous);
            return Err(e);
        }
        Ok(true)
    }

    /// Mutate the value under `key` in place; persists only when `f` reports a change.
    /// Returns `None` if the key is absent, otherwise whatever `f` returned.
    pub async fn modify<F>(&self, key: &K, f: F) -> Result<Option<bool>, ServiceError>
    where
        F: FnOnce(&mut V) -> bool,
    {
        let mut map = self.inner.write().await;
        let Some(value) = map.get_mut(key) else { return Ok(None) };
        let before = value.clone();
        let changed = f(value);
        if changed {
            if let Err(e) = self.save(&map).await {
                map.insert(key.clone(), before);
                return Err(e);
            }
        }
        Ok(Some(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        // initially empty
        assert_eq!(store.values().await.len(), 0);

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        let changed = store.modify(&"a".into(), |v| { *v = "10".into(); true }).await?;
        assert_eq!(changed, Some(true));
        assert_eq!(store.modify(&"zz".into(), |_| true).await?, None);

        // remove and reload persistence
        assert!(store.remove(&"b".into()).await?);
        assert!(!store.remove(&"b".into()).await?);
        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        let values = reloaded.values().await;
        assert_eq!(values, vec!["10".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn in_memory_store_writes_nothing() -> Result<(), anyhow::Error> {
        let store = JsonMapStore::<u32, String>::in_memory();
        store.insert(1, "x".into()).await?;
        assert_eq!(store.get(&1).await.as_deref(), Some("x"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_write_leaves_map_unchanged() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()));
        let store = JsonMapStore::<String, String>::new(&tmp).await?;
        store.insert("a".into(), "1".into()).await?;

        // a directory in place of the data file makes every save fail
        tokio::fs::remove_file(&tmp).await?;
        tokio::fs::create_dir(&tmp).await?;

        assert!(matches!(store.insert("b".into(), "2".into()).await, Err(ServiceError::Storage(_))));
        assert_eq!(store.get(&"b".into()).await, None);

        assert!(store.insert("a".into(), "9".into()).await.is_err());
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        assert!(store.modify(&"a".into(), |v| { *v = "10".into(); true }).await.is_err());
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        assert!(store.remove(&"a".into()).await.is_err());
        assert_eq!(store.values().await, vec!["1".to_string()]);

        let _ = tokio::fs::remove_dir(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn unusable_parent_dir_is_an_error() -> Result<(), anyhow::Error> {
        let blocker = std::env::temp_dir().join(format!("json_map_store_{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&blocker, b"x").await?;
        let res = JsonMapStore::<String, String>::new(blocker.join("data.json")).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&blocker).await;
        Ok(())
    }
}
