//! The diff-and-copy loop.
//!
//! Two phases: drain the target bucket's listing into a key set, then
//! walk the source listing page by page, copying every key that is not
//! a directory marker and not already present in the target.  Strictly
//! sequential; the key set is built once and read-only afterward, so
//! objects added to the target concurrently are not detected.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::errors::SyncError;
use crate::store::{ListingPage, ObjectStore, PAGE_SIZE};

/// Per-run counters, accumulated across pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Objects fetched and uploaded this run.
    pub copied: u64,
    /// Keys skipped because the target already had them.
    pub already_present: u64,
    /// Directory-marker keys skipped.
    pub directory_markers: u64,
    /// Objects whose fetch or upload failed; re-attempted only by
    /// re-running the tool.
    pub failed: u64,
}

/// True for keys that denote directory placeholders rather than objects.
pub fn is_directory_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// The cursor for the page after `page`, or `None` when the listing is
/// exhausted.
///
/// An empty page that still claims truncation has no key to continue
/// from and is treated as terminal rather than looping on an unchanged
/// cursor.
fn next_cursor(page: &ListingPage) -> Option<String> {
    if !page.truncated {
        return None;
    }
    page.last_key().map(str::to_string)
}

/// Drain the target bucket's listing into a set of all non-directory
/// keys.
///
/// Fails fast on any listing error: a partial key set would turn into
/// wrong skip decisions later in the run.
pub async fn build_key_set(target: &dyn ObjectStore) -> Result<HashSet<String>, SyncError> {
    let mut keys = HashSet::new();
    let mut cursor = String::new();

    loop {
        let page = target.list_page(&cursor).await?;
        for key in &page.keys {
            if !is_directory_marker(key) {
                keys.insert(key.clone());
            }
        }
        match next_cursor(&page) {
            Some(last) => cursor = last,
            None => break,
        }
    }

    info!("target bucket already holds {} objects", keys.len());
    Ok(keys)
}

/// Walk the source listing page by page, copying missing objects into
/// the target.
///
/// Listing errors abort the run; per-object fetch/upload errors are
/// logged and counted, and the run continues with the next object.
pub async fn run(
    source: &dyn ObjectStore,
    target: &dyn ObjectStore,
    existing: &HashSet<String>,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();
    let mut cursor = String::new();

    loop {
        let page = source.list_page(&cursor).await?;
        copy_page(&page, existing, source, target, &mut report).await;

        match next_cursor(&page) {
            Some(last) => {
                info!("there are more objects than {PAGE_SIZE}, continuing after {last}");
                cursor = last;
            }
            None => break,
        }
    }

    info!(
        "done copying objects: copied={} already_present={} directory_markers={} failed={}",
        report.copied, report.already_present, report.directory_markers, report.failed
    );
    Ok(report)
}

/// Copy one page of candidate keys, strictly in listing order.
///
/// Directory markers and already-present keys are skipped.  A fetch
/// failure abandons the object before any upload is attempted.
async fn copy_page(
    page: &ListingPage,
    existing: &HashSet<String>,
    source: &dyn ObjectStore,
    target: &dyn ObjectStore,
    report: &mut SyncReport,
) {
    for key in &page.keys {
        if is_directory_marker(key) {
            report.directory_markers += 1;
            continue;
        }
        if existing.contains(key) {
            info!("already copied, skipping {key}");
            report.already_present += 1;
            continue;
        }

        let data = match source.fetch_public(key).await {
            Ok(data) => data,
            Err(err) => {
                warn!("{err}");
                report.failed += 1;
                continue;
            }
        };

        match target.put_object(key, data).await {
            Ok(()) => {
                info!("copied {key}");
                report.copied += 1;
            }
            Err(err) => {
                warn!("{err}");
                report.failed += 1;
            }
        }
    }
}

// -- Tests -------------------------------------------------------------------
