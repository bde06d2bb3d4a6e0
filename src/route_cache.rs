//! # Route Cache
//!
//! Persists the compiled route table so a restart with unchanged declarations
//! skips pattern parsing and sorting.
//!
//! The record is a JSON file keyed by a [`Fingerprint`] of the declaration
//! set. Entries are stored in final match order together with their compiled
//! segments; restoring a record only re-creates regex objects and appends
//! entries to their partitions.
//!
//! A cache is never required: an absent, stale or corrupt record is a miss
//! and the caller rebuilds from declarations. Write failures are reported to
//! the caller, who logs them and keeps the in-memory table.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use http::Method;

use crate::declaration::RouteModule;
use crate::ids::HandlerId;
use crate::pattern::{RoutePattern, Segment};
use crate::router::{PriorityTier, RouteEntry, RouteTable};

/// Bumped whenever the record layout changes; older records are stale.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// SHA-256 digest (hex) of a declaration set.
///
/// Covers, in order, every expanded `(method, raw pattern, handler, priority,
/// skip_csrf)` of every module, with module boundaries. Any change to the
/// declarations that could change the compiled table changes the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn of(modules: &[RouteModule]) -> Self {
        let mut hasher = Sha256::new();
        for module in modules {
            hasher.update(b"module");
            for declaration in &module.routes {
                for raw in &declaration.patterns {
                    for field in [
                        declaration.method.as_str(),
                        raw.as_str(),
                        declaration.handler.as_str(),
                        priority_tag(declaration.priority),
                        if declaration.skip_csrf { "1" } else { "0" },
                    ] {
                        // Length prefix keeps field boundaries unambiguous
                        hasher.update((field.len() as u64).to_le_bytes());
                        hasher.update(field.as_bytes());
                    }
                }
            }
        }
        let digest = hasher.finalize();
        let hex = digest.iter().map(|b| format!("{b:02x}")).collect();
        Fingerprint(hex)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn priority_tag(priority: PriorityTier) -> &'static str {
    match priority {
        PriorityTier::First => "first",
        PriorityTier::Normal => "normal",
        PriorityTier::Last => "last",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CachedSegment {
    Static { literal: String },
    Param { name: String },
    RegexParam { name: String, source: String },
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CachedEntry {
    method: String,
    raw: String,
    segments: Vec<CachedSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    handler: HandlerId,
    priority: PriorityTier,
    discovery_order: u64,
    #[serde(default)]
    skip_csrf: bool,
    #[serde(default)]
    implicit_head: bool,
}

impl CachedEntry {
    fn from_entry(entry: &RouteEntry) -> Self {
        let segments = entry
            .pattern
            .segments()
            .iter()
            .map(|segment| match segment {
                Segment::Static(literal) => CachedSegment::Static {
                    literal: literal.clone(),
                },
                Segment::Param(name) => CachedSegment::Param {
                    name: name.to_string(),
                },
                Segment::RegexParam { name, source, .. } => CachedSegment::RegexParam {
                    name: name.to_string(),
                    source: source.clone(),
                },
                Segment::Wildcard => CachedSegment::Wildcard,
            })
            .collect();
        Self {
            method: entry.method.as_str().to_string(),
            raw: entry.pattern.raw().to_string(),
            segments,
            format: entry.pattern.format().map(str::to_string),
            handler: entry.handler.clone(),
            priority: entry.priority,
            discovery_order: entry.discovery_order,
            skip_csrf: entry.skip_csrf,
            implicit_head: entry.implicit_head,
        }
    }

    fn into_entry(self) -> Result<RouteEntry, String> {
        let method = Method::from_str(&self.method)
            .map_err(|e| format!("invalid method '{}': {e}", self.method))?;
        let segments = self
            .segments
            .into_iter()
            .map(|segment| match segment {
                CachedSegment::Static { literal } => Ok(Segment::Static(literal)),
                CachedSegment::Param { name } => Ok(Segment::Param(Arc::from(name))),
                CachedSegment::RegexParam { name, source } => Segment::regex_param(&name, &source)
                    .map_err(|e| format!("invalid regex <{source}> in '{}': {e}", self.raw)),
                CachedSegment::Wildcard => Ok(Segment::Wildcard),
            })
            .collect::<Result<Vec<_>, String>>()?;
        let pattern = RoutePattern::from_parts(self.raw, segments, self.format.map(Arc::from));

        Ok(RouteEntry {
            method,
            pattern: Arc::new(pattern),
            handler: self.handler,
            priority: self.priority,
            discovery_order: self.discovery_order,
            skip_csrf: self.skip_csrf,
            implicit_head: self.implicit_head,
        })
    }
}

/// A persisted compiled table plus the fingerprint it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    format_version: u32,
    fingerprint: Fingerprint,
    next_order: u64,
    entries: Vec<CachedEntry>,
}

impl CacheRecord {
    #[must_use]
    pub fn from_table(fingerprint: &Fingerprint, table: &RouteTable) -> Self {
        Self {
            format_version: CACHE_FORMAT_VERSION,
            fingerprint: fingerprint.clone(),
            next_order: table.next_order(),
            entries: table.entries().map(|e| CachedEntry::from_entry(e)).collect(),
        }
    }

    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restore the table, keeping the stored order.
    fn into_table(self) -> Result<RouteTable, String> {
        let entries = self
            .entries
            .into_iter()
            .map(CachedEntry::into_entry)
            .collect::<Result<Vec<_>, String>>()?;
        RouteTable::from_ordered(entries, self.next_order)
            .ok_or_else(|| "record contains an unsupported method".to_string())
    }
}

/// Why a cache lookup did not produce a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// No record on disk
    Absent,
    /// Record built from different declarations, or an older record format
    Stale,
    /// Record unreadable or not restorable
    Corrupt(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::Absent => write!(f, "absent"),
            MissReason::Stale => write!(f, "stale"),
            MissReason::Corrupt(detail) => write!(f, "corrupt: {detail}"),
        }
    }
}

/// Outcome of consulting the cache.
#[derive(Debug)]
pub enum CacheLookup {
    Hit(RouteTable),
    Miss(MissReason),
}

/// Errors writing a cache record
#[derive(Debug)]
pub enum CacheError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "failed to write route cache: {e}"),
            CacheError::Serialize(e) => write!(f, "failed to serialize route cache: {e}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(e) => Some(e),
            CacheError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        CacheError::Io(e)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialize(e)
    }
}

fn read_record(path: &Path) -> Result<Option<CacheRecord>, String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Read the record at `path`.
///
/// Missing, unreadable and malformed files all yield `None`; the latter two
/// are logged.
#[must_use]
pub fn load(path: &Path) -> Option<CacheRecord> {
    match read_record(path) {
        Ok(record) => record,
        Err(detail) => {
            warn!(path = %path.display(), error = %detail, "Ignoring corrupt route cache");
            None
        }
    }
}

/// Use `record` if it was built from the declarations `fingerprint` describes.
pub fn try_use_cache(fingerprint: &Fingerprint, record: CacheRecord) -> CacheLookup {
    if record.format_version != CACHE_FORMAT_VERSION || record.fingerprint != *fingerprint {
        return CacheLookup::Miss(MissReason::Stale);
    }
    match record.into_table() {
        Ok(table) => CacheLookup::Hit(table),
        Err(detail) => {
            warn!(error = %detail, "Ignoring corrupt route cache");
            CacheLookup::Miss(MissReason::Corrupt(detail))
        }
    }
}

/// [`load`] followed by [`try_use_cache`], reporting why a miss happened.
pub fn lookup(path: &Path, fingerprint: &Fingerprint) -> CacheLookup {
    match read_record(path) {
        Ok(Some(record)) => try_use_cache(fingerprint, record),
        Ok(None) => CacheLookup::Miss(MissReason::Absent),
        Err(detail) => {
            warn!(path = %path.display(), error = %detail, "Ignoring corrupt route cache");
            CacheLookup::Miss(MissReason::Corrupt(detail))
        }
    }
}

/// Write `table` to `path`, replacing any previous record.
///
/// The record is written to a sibling temporary file first and renamed over
/// `path`, so readers never see a half-written record.
pub fn save(path: &Path, fingerprint: &Fingerprint, table: &RouteTable) -> Result<(), CacheError> {
    let record = CacheRecord::from_table(fingerprint, table);
    let json = serde_json::to_vec(&record)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, &json)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
            debug!(path = %tmp_path.display(), error = %cleanup, "Failed to remove temporary cache file");
        }
        return Err(e.into());
    }

    debug!(
        path = %path.display(),
        entries = record.len(),
        bytes = json.len(),
        "Saved route cache"
    );
    Ok(())
}
