use async_trait::async_trait;
use chrono::Utc;
use redb::ReadableTable;

use crate::db::{tables, Db};
use crate::models::{BlobContent, BlobRecord, StoredBlob};
use crate::storage::{BlobStore, BlobStoreError, StoreResult};

const BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();

/// Blob store backed by the embedded redb database
///
/// Bytes and metadata live in separate tables keyed by pathname. Public URLs
/// are `{public_base_url}/{pathname}`.
#[derive(Clone)]
pub struct RedbBlobStore {
    db: Db,
    public_base_url: String,
}

impl RedbBlobStore {
    pub fn new(db: Db, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            db,
            public_base_url,
        }
    }

    /// Public URL for a pathname
    pub fn public_url(&self, pathname: &str) -> String {
        format!("{}/{}", self.public_base_url, pathname)
    }

    /// Map a public URL back to the pathname it serves
    fn pathname_for_url(&self, url: &str) -> Option<String> {
        let url = url.split(['?', '#']).next().unwrap_or(url);
        let pathname = url
            .strip_prefix(self.public_base_url.as_str())?
            .strip_prefix('/')?;
        if pathname.is_empty() {
            return None;
        }
        Some(pathname.to_string())
    }
}

#[async_trait]
impl BlobStore for RedbBlobStore {
    async fn put(
        &self,
        pathname: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StoreResult<StoredBlob> {
        let db = self.db.clone();
        let key = pathname.to_string();
        let now = Utc::now();
        let size = data.len() as u64;
        let record = BlobRecord::new(size, now, content_type);

        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let record_bytes = bincode::serde::encode_to_vec(&record, BINCODE_CONFIG)?;

            let write_txn = db.begin_write()?;
            {
                let mut meta = write_txn.open_table(tables::BLOB_META)?;
                if meta.get(key.as_str())?.is_some() {
                    tracing::warn!("Refusing to overwrite existing blob: {}", key);
                    return Err(BlobStoreError::AlreadyExists(key));
                }
                meta.insert(key.as_str(), record_bytes.as_slice())?;

                let mut blobs = write_txn.open_table(tables::BLOBS)?;
                blobs.insert(key.as_str(), data.as_slice())?;
            }
            write_txn.commit()?;

            Ok(())
        })
        .await??;

        Ok(StoredBlob {
            pathname: pathname.to_string(),
            url: self.public_url(pathname),
            size,
            uploaded_at: now,
        })
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<StoredBlob>> {
        let db = self.db.clone();
        let prefix = prefix.to_string();

        let records = tokio::task::spawn_blocking(move || -> StoreResult<Vec<(String, BlobRecord)>> {
            let read_txn = db.begin_read()?;
            let meta = read_txn.open_table(tables::BLOB_META)?;

            let mut records = Vec::new();
            for entry in meta.iter()? {
                let (key, value) = entry?;
                let pathname = key.value();
                if !pathname.starts_with(prefix.as_str()) {
                    continue;
                }
                let (record, _): (BlobRecord, _) =
                    bincode::serde::decode_from_slice(value.value(), BINCODE_CONFIG)?;
                records.push((pathname.to_string(), record));
            }

            Ok(records)
        })
        .await??;

        Ok(records
            .into_iter()
            .map(|(pathname, record)| StoredBlob {
                url: self.public_url(&pathname),
                size: record.size,
                uploaded_at: record.uploaded_at(),
                pathname,
            })
            .collect())
    }

    async fn get(&self, pathname: &str) -> StoreResult<Option<BlobContent>> {
        let db = self.db.clone();
        let key = pathname.to_string();

        tokio::task::spawn_blocking(move || -> StoreResult<Option<BlobContent>> {
            let read_txn = db.begin_read()?;
            let meta = read_txn.open_table(tables::BLOB_META)?;
            let blobs = read_txn.open_table(tables::BLOBS)?;

            let record: BlobRecord = match meta.get(key.as_str())? {
                Some(bytes) => bincode::serde::decode_from_slice(bytes.value(), BINCODE_CONFIG)?.0,
                None => return Ok(None),
            };
            let data = match blobs.get(key.as_str())? {
                Some(bytes) => bytes.value().to_vec(),
                None => {
                    tracing::warn!("Blob metadata without content: {}", key);
                    return Ok(None);
                }
            };

            Ok(Some(BlobContent {
                content_type: record.content_type,
                data,
            }))
        })
        .await?
    }

    async fn delete(&self, url: &str) -> StoreResult<()> {
        let key = self
            .pathname_for_url(url)
            .ok_or_else(|| BlobStoreError::ForeignUrl(url.to_string()))?;
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            let write_txn = db.begin_write()?;
            let existed = {
                let mut meta = write_txn.open_table(tables::BLOB_META)?;
                let existed = meta.remove(key.as_str())?.is_some();

                let mut blobs = write_txn.open_table(tables::BLOBS)?;
                blobs.remove(key.as_str())?;
                existed
            };
            write_txn.commit()?;

            if existed {
                tracing::info!("Deleted blob: {}", key);
            } else {
                tracing::debug!("Delete of missing blob ignored: {}", key);
            }

            Ok(())
        })
        .await?
    }

    async fn ping(&self) -> StoreResult<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || -> StoreResult<()> {
            db.begin_read()?;
            Ok(())
        })
        .await?
    }
}
