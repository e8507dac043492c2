//! Archive Aggregator - recursive unpack, analyze, merge
//!
//! Members are unpacked into a scratch directory, routed back through
//! the dispatcher one by one, and their bags concatenated in traversal
//! order. One corrupt member never poisons the container: it logs and
//! contributes an empty bag. Member count, inflated size and nesting
//! depth are all bounded.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::constants::{MAX_ARCHIVE_DEPTH, MAX_ARCHIVE_MEMBERS, MAX_MEMBER_BYTES};
use crate::logic::errors::{TriageError, TriageResult};
use super::bag::FeatureBag;
use super::dispatch;

pub fn extract(path: &Path) -> FeatureBag {
    extract_at_depth(path, 0)
}

pub(super) fn extract_at_depth(path: &Path, depth: usize) -> FeatureBag {
    if depth >= MAX_ARCHIVE_DEPTH {
        log::warn!(
            "nesting depth {} reached at {}, not descending further",
            MAX_ARCHIVE_DEPTH,
            path.display()
        );
        return FeatureBag::new();
    }

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("no scratch directory for {}: {}", path.display(), e);
            return FeatureBag::new();
        }
    };

    if let Err(e) = unpack(path, scratch.path()) {
        log::warn!("unpack failed for {}: {}", path.display(), e);
        return FeatureBag::new();
    }

    let mut merged = FeatureBag::new();
    for entry in WalkDir::new(scratch.path())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .flatten()
    {
        if entry.file_type().is_file() {
            merged.merge(dispatch::extract_at_depth(entry.path(), depth + 1));
        }
    }
    merged
}

/// Inflate members into `dest`. Hostile paths (absolute, `..`) and
/// unreadable members are skipped with a warning; oversized members are
/// truncated at the byte cap.
fn unpack(path: &Path, dest: &Path) -> TriageResult<()> {
    let file = File::open(path).map_err(|e| TriageError::ExtractionIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| TriageError::ParseFailure {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let total = archive.len();
    if total > MAX_ARCHIVE_MEMBERS {
        log::warn!(
            "{} has {} members, analyzing first {}",
            path.display(),
            total,
            MAX_ARCHIVE_MEMBERS
        );
    }

    for index in 0..total.min(MAX_ARCHIVE_MEMBERS) {
        let mut member = match archive.by_index(index) {
            Ok(member) => member,
            Err(e) => {
                log::warn!("skipping member {} of {}: {}", index, path.display(), e);
                continue;
            }
        };

        let Some(relative) = member.enclosed_name() else {
            log::warn!(
                "skipping member with hostile path {:?} in {}",
                member.name(),
                path.display()
            );
            continue;
        };
        let out_path = dest.join(relative);

        if member.is_dir() {
            if let Err(e) = fs::create_dir_all(&out_path) {
                log::warn!("cannot create {}: {}", out_path.display(), e);
            }
            continue;
        }

        if let Some(parent) = out_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("cannot create {}: {}", parent.display(), e);
                continue;
            }
        }

        match File::create(&out_path) {
            Ok(mut out) => {
                let mut bounded = member.by_ref().take(MAX_MEMBER_BYTES);
                if let Err(e) = std::io::copy(&mut bounded, &mut out) {
                    log::warn!("failed to inflate {}: {}", out_path.display(), e);
                }
            }
            Err(e) => log::warn!("cannot write {}: {}", out_path.display(), e),
        }
    }

    Ok(())
}
