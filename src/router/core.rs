//! Router core module - the compiled route table and the request hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::entry::{method_index, RouteEntry, SUPPORTED_METHODS};
use crate::ids::HandlerId;
use crate::pattern::RequestPath;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 path params (e.g., `users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names are `Arc<str>` shared with the compiled pattern, so binding a
/// name is an atomic increment. Values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The entry that matched (first in match order)
    pub entry: Arc<RouteEntry>,
    /// Path parameters in path order, including the wildcard remainder under `*`
    pub path_params: ParamVec,
    /// Handler that owns the entry
    pub handler: HandlerId,
    /// The request is HEAD served by a GET route: dispatch must drop the body
    pub suppress_body: bool,
}

impl RouteMatch {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics when a name repeats at different
    /// depths of the pattern.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Compiled route table, partitioned by method
///
/// Each partition is kept sorted by `(priority, specificity, discovery order)`
/// and matching walks it front to back, stopping at the first entry whose
/// pattern matches. The order is total: two entries never compare equal
/// because discovery order is unique per table.
///
/// A table is built once at boot and then only read. Administrative removals
/// ([`without_handler`](Self::without_handler),
/// [`without_prefix`](Self::without_prefix)) return a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    /// Indexed like [`SUPPORTED_METHODS`]
    partitions: Vec<Vec<Arc<RouteEntry>>>,
    /// Discovery order handed to the next registered entry
    next_order: u64,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            partitions: vec![Vec::new(); SUPPORTED_METHODS.len()],
            next_order: 0,
        }
    }

    /// Rebuild a table from entries already in final match order.
    ///
    /// Used by the route cache: no sorting happens, entries are appended to
    /// their partitions in the order given.
    pub(crate) fn from_ordered(entries: Vec<RouteEntry>, next_order: u64) -> Option<Self> {
        let mut table = Self::new();
        for entry in entries {
            let idx = method_index(&entry.method)?;
            table.partitions[idx].push(Arc::new(entry));
        }
        table.next_order = next_order;
        Some(table)
    }

    /// Insert one compiled entry into its method partition
    ///
    /// The entry's discovery order is assigned here. A GET entry also
    /// registers an implicit HEAD twin with the same pattern and handler.
    pub fn register(&mut self, mut entry: RouteEntry) {
        let Some(idx) = method_index(&entry.method) else {
            warn!(
                method = %entry.method,
                pattern = %entry.pattern,
                handler = %entry.handler,
                "Ignoring route with unsupported method"
            );
            return;
        };

        entry.discovery_order = self.next_order;
        self.next_order += 1;

        let head = (entry.method == Method::GET).then(|| RouteEntry {
            method: Method::HEAD,
            implicit_head: true,
            ..entry.clone()
        });

        self.insert_sorted(idx, entry);
        if let Some(head) = head {
            if let Some(head_idx) = method_index(&Method::HEAD) {
                self.insert_sorted(head_idx, head);
            }
        }
    }

    fn insert_sorted(&mut self, idx: usize, entry: RouteEntry) {
        let key = entry.sort_key();
        let partition = &mut self.partitions[idx];
        let pos = partition.partition_point(|e| e.sort_key() <= key);
        partition.insert(pos, Arc::new(entry));
    }

    /// Append every entry of `other` to this table
    ///
    /// Used to compose route sets from independently packaged modules. The
    /// other table's declared entries are re-registered in their original
    /// discovery order and receive fresh discovery orders after this table's
    /// own, so merge order only breaks ties between otherwise-equal entries.
    /// Priority tiers are never overridden by merge order.
    pub fn merge(&mut self, other: RouteTable) {
        let incoming: Vec<RouteEntry> = other
            .declared_entries()
            .into_iter()
            .map(|e| (*e).clone())
            .collect();
        let count = incoming.len();
        for entry in incoming {
            self.register(entry);
        }
        debug!(merged = count, total = self.len(), "Merged route table");
    }

    /// Entries as registered (implicit HEAD twins excluded), in discovery order.
    #[must_use]
    pub fn declared_entries(&self) -> Vec<Arc<RouteEntry>> {
        let mut entries: Vec<Arc<RouteEntry>> = self
            .partitions
            .iter()
            .flatten()
            .filter(|e| !e.implicit_head)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.discovery_order);
        entries
    }

    /// Match an HTTP request to a route
    ///
    /// Walks the method's partition in order and returns the first entry whose
    /// pattern matches `path`. A HEAD request with no matching HEAD entry is
    /// retried against the GET partition, with `suppress_body` set.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the owning entry and the extracted parameters
    /// * `None` - no entry matches (the caller answers 404)
    ///
    /// # Example
    ///
    /// ```rust
    /// use http::Method;
    /// use routemap::declaration::{build_table, RouteModule};
    ///
    /// let module = RouteModule::new("blog").get(["articles/:id"], "ArticlesShow");
    /// let table = build_table(&module).unwrap();
    ///
    /// let m = table.route(&Method::GET, "/articles/42").unwrap();
    /// assert_eq!(m.handler.as_str(), "ArticlesShow");
    /// assert_eq!(m.get_path_param("id"), Some("42"));
    /// ```
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = std::time::Instant::now();
        let request = RequestPath::parse(path);

        let mut found = self.find(method, &request);
        let mut head_fallback = false;
        if found.is_none() && *method == Method::HEAD {
            found = self.find(&Method::GET, &request);
            head_fallback = found.is_some();
        }

        let match_duration = match_start.elapsed();

        let Some((entry, path_params)) = found else {
            debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return None;
        };

        if match_duration > std::time::Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                handler = %entry.handler,
                route_pattern = %entry.pattern,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                handler = %entry.handler,
                route_pattern = %entry.pattern,
                path_params = ?path_params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Some(RouteMatch {
            handler: entry.handler.clone(),
            suppress_body: entry.implicit_head || head_fallback,
            entry,
            path_params,
        })
    }

    fn find(&self, method: &Method, request: &RequestPath<'_>) -> Option<(Arc<RouteEntry>, ParamVec)> {
        let partition = self.partitions.get(method_index(method)?)?;
        partition.iter().find_map(|entry| {
            entry
                .pattern
                .match_path(request)
                .map(|params| (Arc::clone(entry), params))
        })
    }

    /// A new table without any entry owned by `handler`.
    #[must_use]
    pub fn without_handler(&self, handler: &str) -> RouteTable {
        let table = self.retain(|e| e.handler.as_str() != handler);
        info!(
            handler = %handler,
            removed = self.len() - table.len(),
            remaining = table.len(),
            "Removed routes by handler"
        );
        table
    }

    /// A new table without any entry whose pattern starts with the static
    /// segments of `prefix` (`"articles"` and `"/articles"` are equivalent).
    ///
    /// An empty prefix removes nothing.
    #[must_use]
    pub fn without_prefix(&self, prefix: &str) -> RouteTable {
        let wanted: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
        if wanted.is_empty() {
            warn!("Ignoring route removal with an empty prefix");
            return self.clone();
        }

        let table = self.retain(|e| {
            let mut leading = e.pattern.static_prefix();
            !wanted.iter().all(|w| leading.next() == Some(*w))
        });
        info!(
            prefix = %prefix,
            removed = self.len() - table.len(),
            remaining = table.len(),
            "Removed routes by prefix"
        );
        table
    }

    fn retain(&self, keep: impl Fn(&RouteEntry) -> bool) -> RouteTable {
        RouteTable {
            partitions: self
                .partitions
                .iter()
                .map(|p| p.iter().filter(|e| keep(e.as_ref())).cloned().collect())
                .collect(),
            next_order: self.next_order,
        }
    }

    /// Entries of one method, in match order.
    #[must_use]
    pub fn partition(&self, method: &Method) -> &[Arc<RouteEntry>] {
        method_index(method)
            .and_then(|idx| self.partitions.get(idx))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All entries, grouped by method and in match order within each method.
    pub fn entries(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.partitions.iter().flatten()
    }

    /// Total number of entries, implicit HEAD twins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Number of distinct handlers owning at least one entry.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.entries()
            .map(|e| &e.handler)
            .collect::<HashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    pub(crate) fn next_order(&self) -> u64 {
        self.next_order
    }

    /// Emit the compiled table, one line per entry in final match order.
    ///
    /// Operators rely on this listing to see which route wins for a path.
    pub fn log_routes(&self) {
        info!(
            routes_count = self.len(),
            handlers = self.handler_count(),
            "Routing table loaded"
        );
        for entry in self.entries() {
            info!(
                method = %entry.method,
                pattern = %entry.pattern,
                handler = %entry.handler,
                priority = %entry.priority,
                implicit_head = entry.implicit_head,
                "route"
            );
        }
    }

    /// Render the compiled table as text, one line per entry in match order.
    #[must_use]
    pub fn dump_routes(&self) -> String {
        let width = self
            .entries()
            .map(|e| e.pattern.raw().len())
            .max()
            .unwrap_or(0);
        self.entries()
            .map(|entry| {
                format!(
                    "{:<7} {:<width$} -> {}\n",
                    entry.method.as_str(),
                    entry.pattern.raw(),
                    entry.handler,
                )
            })
            .collect()
    }
}
