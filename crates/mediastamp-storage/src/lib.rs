//! Mediastamp storage library
//!
//! Capability-typed access to the remote file store backing the service.
//! The [`RemoteStore`] trait covers the full capability set the service
//! consumes: existence check, stat, ranged/unranged read streams, write
//! streams, directory listing, move, and delete. Backends exist for
//! S3-compatible stores and the local filesystem.
//!
//! # Key format
//!
//! Store keys are hierarchical, `/`-separated paths. Tenant media lives under
//! `organizations/{org}/{folder}/{filename}`; logos under
//! `{scope}/logo{ext}`. Keys must not contain `..` or a leading `/`. Key
//! construction is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

pub use factory::create_store;
pub use local::LocalStore;
pub use s3::S3Store;
pub use traits::{
    ByteRange, ByteStream, ObjectStat, RemoteStore, StorageError, StorageResult, StoreEntry,
};
