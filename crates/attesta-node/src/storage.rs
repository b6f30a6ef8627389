//! RocksDB persistence for the audit log.
//!
//! The audit log is the only thing the node persists: registry state is
//! rebuilt by replaying it at startup. Entries are keyed by their
//! big-endian sequence number so an iterator yields them in mutation order.

use anyhow::Result;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::path::Path;

use attesta_core::AuditEntry;

const CF_AUDIT: &str = "audit";
const CF_META: &str = "meta";

const META_OWNER: &[u8] = b"owner";

/// RocksDB-backed storage for the Attesta node.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create the database at the given path with column families.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_AUDIT, Options::default()),
            ColumnFamilyDescriptor::new(CF_META, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    /// The owner this data directory was created for, if recorded.
    pub fn owner(&self) -> Result<Option<String>> {
        let cf = self
            .db
            .cf_handle(CF_META)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_META))?;
        let value = self.db.get_cf(&cf, META_OWNER)?;
        Ok(value.map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    /// Record the owner at first startup.
    pub fn set_owner(&self, owner: &str) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_META)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_META))?;
        self.db.put_cf(&cf, META_OWNER, owner.as_bytes())?;
        Ok(())
    }

    /// Append one audit entry. Keys are big-endian sequence numbers.
    pub fn append_entry(&self, entry: &AuditEntry) -> Result<()> {
        let cf = self
            .db
            .cf_handle(CF_AUDIT)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_AUDIT))?;
        let value = serde_json::to_vec(entry)?;
        self.db.put_cf(&cf, entry.seq.to_be_bytes(), value)?;
        Ok(())
    }

    /// Load the full audit log in sequence order.
    pub fn load_entries(&self) -> Result<Vec<AuditEntry>> {
        let cf = self
            .db
            .cf_handle(CF_AUDIT)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", CF_AUDIT))?;
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }
}
