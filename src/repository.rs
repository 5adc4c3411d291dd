use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Article, ContentPiece};
use crate::storage::Storage;

/// A keyed collection over the storage port with a sidecar index list.
///
/// Records live under `{prefix}:{id}` and the index of live ids under
/// `{prefix}:index`. The record write and the index append are two separate
/// round-trips; the host serializes invocations, so no locking is done here.
pub struct Collection<T> {
    storage: Arc<dyn Storage>,
    prefix: &'static str,
    _record: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(storage: Arc<dyn Storage>, prefix: &'static str) -> Self {
        Self {
            storage,
            prefix,
            _record: PhantomData,
        }
    }

    fn record_key(&self, id: &str) -> String {
        format!("{}:{}", self.prefix, id)
    }

    fn index_key(&self) -> String {
        format!("{}:index", self.prefix)
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        let value = self.storage.get(&self.record_key(id)).await?;
        match value {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Store a record and append its id to the index if not already present.
    pub async fn put(&self, id: &str, record: &T) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.storage.set(&self.record_key(id), value).await?;

        let mut index = self.index().await?;
        if !index.iter().any(|existing| existing == id) {
            index.push(id.to_string());
            self.storage
                .set(&self.index_key(), serde_json::to_value(&index)?)
                .await?;
        }
        Ok(())
    }

    /// Delete a record; the index is only updated when the record delete
    /// actually removed something. Returns whether removal occurred.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.storage.delete(&self.record_key(id)).await?;
        if removed {
            let index: Vec<String> = self
                .index()
                .await?
                .into_iter()
                .filter(|existing| existing != id)
                .collect();
            self.storage
                .set(&self.index_key(), serde_json::to_value(&index)?)
                .await?;
        }
        Ok(removed)
    }

    pub async fn index(&self) -> Result<Vec<String>> {
        let value = self.storage.get(&self.index_key()).await?;
        match value {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Resolve every indexed id to its record. Ids whose lookup fails are
    /// skipped so enumeration tolerates index/record drift.
    pub async fn list_all(&self) -> Result<Vec<T>> {
        let index = self.index().await?;
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = index.iter().map(|id| self.record_key(id)).collect();
        let values = self.storage.get_many(&keys).await?;

        let mut records = Vec::with_capacity(values.len());
        for (id, value) in index.iter().zip(values) {
            match value {
                Some(value) => match serde_json::from_value::<T>(value) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!("Skipping undecodable record {}: {}", id, e);
                    }
                },
                None => {
                    tracing::debug!("Index entry {} has no record, skipping", id);
                }
            }
        }
        Ok(records)
    }
}

/// The plugin's two collections.
pub struct Repository {
    pub contents: Collection<ContentPiece>,
    pub articles: Collection<Article>,
}

impl Repository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            contents: Collection::new(Arc::clone(&storage), "content"),
            articles: Collection::new(storage, "article"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{ContentPiece, InspirationType};
    use crate::storage::MemoryStorage;

    use super::*;

    fn piece(title: &str) -> ContentPiece {
        ContentPiece::new(
            title.to_string(),
            "https://example.com".to_string(),
            "body".to_string(),
            vec!["tag".to_string()],
            InspirationType::Single,
        )
    }

    fn collection() -> (Arc<MemoryStorage>, Collection<ContentPiece>) {
        let storage = Arc::new(MemoryStorage::new());
        let collection = Collection::new(storage.clone(), "content");
        (storage, collection)
    }

    #[tokio::test]
    async fn put_appends_to_index_once() {
        let (_, contents) = collection();
        let p = piece("one");

        contents.put(&p.id, &p).await.unwrap();
        contents.put(&p.id, &p).await.unwrap();

        assert_eq!(contents.index().await.unwrap(), vec![p.id.clone()]);
        assert_eq!(contents.get(&p.id).await.unwrap().unwrap().title, "one");
    }

    #[tokio::test]
    async fn delete_removes_record_and_index_entry() {
        let (_, contents) = collection();
        let a = piece("a");
        let b = piece("b");
        contents.put(&a.id, &a).await.unwrap();
        contents.put(&b.id, &b).await.unwrap();

        assert!(contents.delete(&a.id).await.unwrap());
        assert_eq!(contents.index().await.unwrap(), vec![b.id.clone()]);
        assert!(contents.get(&a.id).await.unwrap().is_none());

        // Second delete is a no-op and leaves the index alone.
        assert!(!contents.delete(&a.id).await.unwrap());
        assert_eq!(contents.index().await.unwrap(), vec![b.id]);
    }

    #[tokio::test]
    async fn list_all_skips_dangling_index_entries() {
        let (storage, contents) = collection();
        let a = piece("a");
        let b = piece("b");
        contents.put(&a.id, &a).await.unwrap();
        contents.put(&b.id, &b).await.unwrap();

        // Simulate a crash between record delete and index update.
        storage.delete(&format!("content:{}", a.id)).await.unwrap();

        let all = contents.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "b");
    }

    #[tokio::test]
    async fn index_preserves_append_order() {
        let (_, contents) = collection();
        let mut ids = Vec::new();
        for i in 0..5 {
            let p = piece(&format!("p{}", i));
            ids.push(p.id.clone());
            contents.put(&p.id, &p).await.unwrap();
        }
        assert_eq!(contents.index().await.unwrap(), ids);
    }

    #[tokio::test]
    async fn missing_index_reads_as_empty() {
        let (storage, contents) = collection();
        assert!(contents.index().await.unwrap().is_empty());
        assert!(contents.list_all().await.unwrap().is_empty());
        assert_eq!(storage.get("content:index").await.unwrap(), None);
    }
}
