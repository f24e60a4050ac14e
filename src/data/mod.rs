//! Data module - rows, file records, number normalization and the registry

mod normalizer;
mod record;
mod registry;

pub use normalizer::{parse_number, try_parse_number};
pub use record::{columns, FileKind, FileRecord, Row};
pub use registry::{
    BlobStore, FileRegistry, FsBlobStore, MemoryBlobStore, ParsedUpload, RegistryError,
};
