//! Persisted user selections: saved schemes, application status and
//! bookmarked vet contacts, kept in an injected key-value store.

use crate::contacts::VetContact;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SAVED_SCHEMES_KEY: &str = "savedSchemes";
pub const APPLIED_SCHEMES_KEY: &str = "appliedSchemes";
pub const SAVED_CONTACTS_KEY: &str = "savedVetContacts";
pub const CONTACTED_CONTACTS_KEY: &str = "contactedVetContacts";

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store kept as one JSON object in a file, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    Error::Store(format!("Corrupt store file {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened bookmark store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

/// Where the farmer stands with a scheme application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Applied,
    Pending,
    NotApplied,
}

impl std::str::FromStr for ApplicationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "pending" => Ok(ApplicationStatus::Pending),
            "not-applied" | "not_applied" => Ok(ApplicationStatus::NotApplied),
            other => Err(Error::Config(format!(
                "Invalid status '{}'. Allowed values are: applied, pending, not-applied",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedScheme {
    pub scheme_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactedEntry {
    #[serde(flatten)]
    pub contact: VetContact,
    pub contacted_at: DateTime<Utc>,
}

/// User selections on top of a key-value store
pub struct Bookmarks<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Bookmarks<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(key, &raw)
    }

    pub fn saved_schemes(&self) -> Result<Vec<String>> {
        self.load(SAVED_SCHEMES_KEY)
    }

    /// Save or unsave a scheme by name; returns whether it is saved afterwards
    pub fn toggle_saved_scheme(&mut self, name: &str) -> Result<bool> {
        let mut saved = self.saved_schemes()?;
        let now_saved = if let Some(pos) = saved.iter().position(|s| s == name) {
            saved.remove(pos);
            false
        } else {
            saved.push(name.to_string());
            true
        };
        self.save(SAVED_SCHEMES_KEY, &saved)?;
        Ok(now_saved)
    }

    pub fn applied_schemes(&self) -> Result<Vec<AppliedScheme>> {
        self.load(APPLIED_SCHEMES_KEY)
    }

    /// Record a status; an existing entry keeps its `applied_at`
    pub fn set_applied_status(
        &mut self,
        scheme_name: &str,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<AppliedScheme> {
        let mut applied = self.applied_schemes()?;
        let entry = match applied.iter_mut().find(|a| a.scheme_name == scheme_name) {
            Some(existing) => {
                existing.status = status;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let entry = AppliedScheme {
                    scheme_name: scheme_name.to_string(),
                    status,
                    applied_at: now,
                    updated_at: now,
                };
                applied.push(entry.clone());
                entry
            }
        };
        self.save(APPLIED_SCHEMES_KEY, &applied)?;
        Ok(entry)
    }

    pub fn applied_status(&self, scheme_name: &str) -> Result<Option<ApplicationStatus>> {
        Ok(self
            .applied_schemes()?
            .into_iter()
            .find(|a| a.scheme_name == scheme_name)
            .map(|a| a.status))
    }

    pub fn saved_contacts(&self) -> Result<Vec<VetContact>> {
        self.load(SAVED_CONTACTS_KEY)
    }

    /// Save or unsave a contact, matched by name
    pub fn toggle_saved_contact(&mut self, contact: &VetContact) -> Result<bool> {
        let mut saved = self.saved_contacts()?;
        let now_saved = if let Some(pos) = saved.iter().position(|c| c.name == contact.name) {
            saved.remove(pos);
            false
        } else {
            saved.push(contact.clone());
            true
        };
        self.save(SAVED_CONTACTS_KEY, &saved)?;
        Ok(now_saved)
    }

    pub fn contacted(&self) -> Result<Vec<ContactedEntry>> {
        self.load(CONTACTED_CONTACTS_KEY)
    }

    /// Mark or unmark a contact as contacted, matched by name
    pub fn toggle_contacted(&mut self, contact: &VetContact, now: DateTime<Utc>) -> Result<bool> {
        let mut contacted = self.contacted()?;
        let now_contacted =
            if let Some(pos) = contacted.iter().position(|c| c.contact.name == contact.name) {
                contacted.remove(pos);
                false
            } else {
                contacted.push(ContactedEntry {
                    contact: contact.clone(),
                    contacted_at: now,
                });
                true
            };
        self.save(CONTACTED_CONTACTS_KEY, &contacted)?;
        Ok(now_contacted)
    }

    pub fn saved_contact_names(&self) -> Result<Vec<String>> {
        Ok(self.saved_contacts()?.into_iter().map(|c| c.name).collect())
    }

    pub fn contacted_names(&self) -> Result<Vec<String>> {
        Ok(self.contacted()?.into_iter().map(|c| c.contact.name).collect())
    }
}
