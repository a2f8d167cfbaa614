use super::RecordCollection;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// A collection stored in one fjall partition.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn open(keyspace: Arc<Keyspace>, name: &str) -> Result<Self> {
        let partition = keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition: {name}"))?;
        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist records")
    }
}

impl RecordCollection for DiskCollection {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.partition.get(key)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.partition.insert(key.as_bytes(), value)?;
        debug!("Record PUT for key: {}", key);
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<bool> {
        if self.partition.get(key)?.is_none() {
            return Ok(false);
        }
        self.partition.remove(key.as_bytes())?;
        debug!("Record REMOVE for key: {}", key);
        self.persist()?;
        Ok(true)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        self.partition
            .prefix(prefix)
            .map(|item| {
                let (key, value) = item?;
                let key = String::from_utf8(key.to_vec()).context("Record key is not UTF-8")?;
                Ok((key, value.to_vec()))
            })
            .collect()
    }
}
