pub mod disk;
pub mod memory;

use crate::core::records::{Application, Donation, ProgressUpdate};
use anyhow::{Context, Result};
use disk::DiskCollection;
use memory::MemoryCollection;
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Byte level key-value storage for one kind of record.
pub trait RecordCollection: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    /// Returns whether the key was present.
    fn remove(&self, key: &str) -> Result<bool>;
    /// All records whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;
}

/// Applications, donations and progress updates, stored as JSON.
///
/// Applications are keyed by slug, donations by payKey and progress updates
/// by `<slug>/<sequence>`.
pub struct RecordStore {
    applications: Arc<dyn RecordCollection>,
    donations: Arc<dyn RecordCollection>,
    progress: Arc<dyn RecordCollection>,
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).with_context(|| format!("Corrupt record: {key}"))
}

fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record).context("Failed to encode record")
}

fn progress_prefix(slug: &str) -> String {
    format!("{slug}/")
}

impl RecordStore {
    pub fn in_memory() -> Self {
        Self {
            applications: Arc::new(MemoryCollection::new()),
            donations: Arc::new(MemoryCollection::new()),
            progress: Arc::new(MemoryCollection::new()),
        }
    }

    /// Opens (or creates) the on-disk store under `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let records_dir = path.join("records");
        std::fs::create_dir_all(&records_dir)
            .with_context(|| format!("Failed to create directory: {}", records_dir.display()))?;
        let keyspace = fjall::Config::new(&records_dir)
            .open()
            .with_context(|| format!("Failed to open record store: {}", records_dir.display()))?;
        let keyspace = Arc::new(keyspace);
        debug!("Opened record store at {}", records_dir.display());

        Ok(Self {
            applications: Arc::new(DiskCollection::open(Arc::clone(&keyspace), "applications")?),
            donations: Arc::new(DiskCollection::open(Arc::clone(&keyspace), "donations")?),
            progress: Arc::new(DiskCollection::open(keyspace, "progress")?),
        })
    }

    pub fn put_application(&self, app: &Application) -> Result<()> {
        self.applications.put(&app.slug, encode(app)?)
    }

    pub fn get_application(&self, slug: &str) -> Result<Option<Application>> {
        self.applications
            .get(slug)?
            .map(|bytes| decode(slug, &bytes))
            .transpose()
    }

    pub fn find_application_by_name(&self, name: &str) -> Result<Option<Application>> {
        Ok(self
            .list_applications()?
            .into_iter()
            .find(|app| app.name == name))
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        self.applications
            .scan_prefix("")?
            .iter()
            .map(|(key, bytes)| decode(key, bytes))
            .collect()
    }

    /// Removes an application along with its donations and progress updates.
    pub fn delete_application(&self, slug: &str) -> Result<bool> {
        if !self.applications.remove(slug)? {
            return Ok(false);
        }
        for donation in self.donations_for(slug)? {
            self.donations.remove(&donation.pay_key)?;
        }
        for (key, _) in self.progress.scan_prefix(&progress_prefix(slug))? {
            self.progress.remove(&key)?;
        }
        debug!("Deleted application {} and its records", slug);
        Ok(true)
    }

    pub fn put_donation(&self, donation: &Donation) -> Result<()> {
        self.donations.put(&donation.pay_key, encode(donation)?)
    }

    pub fn get_donation(&self, pay_key: &str) -> Result<Option<Donation>> {
        self.donations
            .get(pay_key)?
            .map(|bytes| decode(pay_key, &bytes))
            .transpose()
    }

    /// Every donation of an application, active or not.
    pub fn donations_for(&self, slug: &str) -> Result<Vec<Donation>> {
        let mut donations = Vec::new();
        for (key, bytes) in self.donations.scan_prefix("")? {
            let donation: Donation = decode(&key, &bytes)?;
            if donation.application == slug {
                donations.push(donation);
            }
        }
        Ok(donations)
    }

    pub fn add_progress(&self, update: &ProgressUpdate) -> Result<()> {
        let prefix = progress_prefix(&update.application);
        // updates are only ever removed together with their application
        let sequence = self.progress.scan_prefix(&prefix)?.len();
        let key = format!("{prefix}{sequence:010}");
        self.progress.put(&key, encode(update)?)
    }

    /// Progress updates of an application in the order they were recorded.
    pub fn progress_for(&self, slug: &str) -> Result<Vec<ProgressUpdate>> {
        self.progress
            .scan_prefix(&progress_prefix(slug))?
            .iter()
            .map(|(key, bytes)| decode(key, bytes))
            .collect()
    }
}
