//! Status queries against the host: memory, versions and services

pub mod memory;
pub mod service;
pub mod version;

pub use memory::{parse_memory_ratio, MemoryError, MemoryQuery, MemorySampler, MEM_PERCENT_COLUMN};
pub use service::{ServiceManager, VerificationError};
pub use version::{VersionProbe, VersionReport};
