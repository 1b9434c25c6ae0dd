use std::collections::HashMap;

use crate::phone;

/// Columns copied verbatim from the source row for response passthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub full_name_original: String,
    pub account: String,
    pub client_ref: String,
}

/// One contact as indexed under each of its phone numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub full_name: String,
    pub account_ref: String,
    pub raw: RawRecord,
}

/// In-memory index from normalized phone key to contact.
///
/// Built once by the loader and read-only while serving. Keys are always
/// exactly 10 ASCII digits; a later insert for an existing key replaces
/// the earlier record.
#[derive(Debug, Default)]
pub struct ContactStore {
    entries: HashMap<String, ContactRecord>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `record` under `key`.
    ///
    /// Returns `false` (and stores nothing) when `key` is not a valid phone
    /// key. Returns `true` on insert or overwrite.
    pub fn insert(&mut self, key: String, record: ContactRecord) -> bool {
        if !phone::is_valid_key(&key) {
            return false;
        }
        self.entries.insert(key, record);
        true
    }

    pub fn get(&self, key: &str) -> Option<&ContactRecord> {
        self.entries.get(key)
    }

    /// Number of distinct phone keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
