//! s3migrate library — bucket-to-bucket object migration.
//!
//! Enumerates a source bucket, skips keys already present in the
//! target, fetches each missing object over the source's public base
//! URL, and uploads it to the target with public-read access.  The
//! whole run is sequential: key set first, then one listing page at a
//! time.

pub mod config;
pub mod errors;
pub mod store;
pub mod sync;
