mod file;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key/value storage supplied by the host. Any conforming implementation
/// (in-memory, file-backed, networked) is substitutable.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Returns whether a value was actually removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn list(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<Value>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    async fn set_many(&self, pairs: Vec<(String, Value)>) -> Result<()> {
        for (key, value) in pairs {
            self.set(&key, value).await?;
        }
        Ok(())
    }
}
