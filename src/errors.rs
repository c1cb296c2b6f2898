//! Migration error taxonomy.
//!
//! Listing failures are fatal: a partial listing would make the
//! skip-if-exists check silently wrong, so they unwind to `main` and
//! abort the run.  Fetch and upload failures affect a single object
//! and are handled (logged) where they occur.

use thiserror::Error;

/// Errors produced while migrating objects between buckets.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing a bucket failed.  Fatal to the run.
    #[error("listing objects in bucket {bucket}: {source}")]
    List {
        /// Bucket whose listing failed.
        bucket: String,
        #[source]
        source: anyhow::Error,
    },

    /// Fetching object content from the public URL failed.  Non-fatal:
    /// the object's copy is abandoned for this run.
    #[error("fetching {url}: {source}")]
    Fetch {
        /// Full public URL that was requested.
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Uploading to the target bucket failed.  Non-fatal: the object
    /// stays missing until the next run re-attempts it.
    #[error("uploading {key}: {source}")]
    Upload {
        /// Object key that failed to upload.
        key: String,
        #[source]
        source: anyhow::Error,
    },
}
