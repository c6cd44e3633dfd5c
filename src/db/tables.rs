use redb::TableDefinition;

/// Blob bytes: pathname -> raw content
pub const BLOBS: TableDefinition<&str, &[u8]> = TableDefinition::new("blobs");

/// Blob metadata: pathname -> BlobRecord (serialized)
pub const BLOB_META: TableDefinition<&str, &[u8]> = TableDefinition::new("blob_meta");
