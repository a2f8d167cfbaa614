use super::RecordCollection;
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory collection, ordered by key like the on-disk one.
#[derive(Default)]
pub struct MemoryCollection {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordCollection for MemoryCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let records = self.inner.read().map_err(|_| anyhow!("Record lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut records = self.inner.write().map_err(|_| anyhow!("Record lock poisoned"))?;
        debug!("Record PUT for key: {}", key);
        records.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut records = self.inner.write().map_err(|_| anyhow!("Record lock poisoned"))?;
        debug!("Record REMOVE for key: {}", key);
        Ok(records.remove(key).is_some())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let records = self.inner.read().map_err(|_| anyhow!("Record lock poisoned"))?;
        Ok(records
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
