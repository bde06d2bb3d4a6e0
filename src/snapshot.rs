//! # Route Snapshots
//!
//! The startup pipeline and the published, immutable view of the routes.
//!
//! [`boot`] runs discovery, fingerprinting, the cache lookup, compilation on a
//! miss, the cache save and the startup listing, in that order and on the
//! calling thread. Nothing can match against the table before `boot` returns.
//!
//! After boot a [`Routes`] value is only read. [`SharedRoutes`] publishes a
//! whole new snapshot for administrative removals and hot reloads; a reader
//! that loaded the previous snapshot keeps using it until it is done.
//!
//! ```rust
//! use http::Method;
//! use routemap::declaration::RouteModule;
//! use routemap::snapshot::{boot_modules, SharedRoutes};
//!
//! let modules = vec![RouteModule::new("blog")
//!     .get(["articles/:id"], "ArticlesShow")
//!     .get(["articles/new"], "ArticlesNew")];
//! let shared = SharedRoutes::new(boot_modules(&modules, None).unwrap());
//!
//! let before = shared.load();
//! shared.remove_prefix("articles");
//! assert!(before.route(&Method::GET, "/articles/1").is_some());
//! assert!(shared.load().route(&Method::GET, "/articles/1").is_none());
//! ```

use anyhow::Context;
use arc_swap::ArcSwap;
use http::Method;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::declaration::{build_app_table, load_modules, RouteModule};
use crate::reverse::{ReverseError, ReverseIndex};
use crate::route_cache::{self, CacheLookup, Fingerprint, MissReason};
use crate::router::{RouteMatch, RouteTable};
use crate::runtime_config::RouteConfig;

/// An immutable compiled table plus its reverse index.
#[derive(Debug, Clone)]
pub struct Routes {
    pub table: Arc<RouteTable>,
    pub reverse: Arc<ReverseIndex>,
}

impl Routes {
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        let reverse = ReverseIndex::build(&table);
        Self {
            table: Arc::new(table),
            reverse: Arc::new(reverse),
        }
    }

    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.table.route(method, path)
    }

    pub fn url_for<I, K, V>(&self, handler: &str, args: I) -> Result<String, ReverseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.reverse.url_for(handler, args)
    }
}

/// The currently published [`Routes`] snapshot.
///
/// Reads are lock-free. Writers replace the whole snapshot.
#[derive(Debug)]
pub struct SharedRoutes {
    current: ArcSwap<Routes>,
}

impl SharedRoutes {
    #[must_use]
    pub fn new(routes: Routes) -> Self {
        Self {
            current: ArcSwap::from_pointee(routes),
        }
    }

    /// The current snapshot. Holding it pins that version.
    #[must_use]
    pub fn load(&self) -> Arc<Routes> {
        self.current.load_full()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, routes: Routes) {
        let count = routes.table.len();
        self.current.store(Arc::new(routes));
        info!(routes_count = count, "Published route snapshot");
    }

    /// Publish a snapshot without any route owned by `handler`.
    pub fn remove_handler(&self, handler: &str) -> Arc<Routes> {
        self.current
            .rcu(|current| Routes::new(current.table.without_handler(handler)));
        self.load()
    }

    /// Publish a snapshot without any route under the static `prefix`.
    pub fn remove_prefix(&self, prefix: &str) -> Arc<Routes> {
        self.current
            .rcu(|current| Routes::new(current.table.without_prefix(prefix)));
        self.load()
    }
}

/// Where a booted table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Restored from a cache record matching the declarations
    Cache,
    /// Compiled after a cache miss
    Compiled(MissReason),
    /// Compiled with caching disabled
    CompiledUncached,
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Cache => write!(f, "cache hit"),
            TableSource::Compiled(reason) => write!(f, "compiled (cache {reason})"),
            TableSource::CompiledUncached => write!(f, "compiled (cache disabled)"),
        }
    }
}

/// Restore the table from `cache_path` or compile it from `modules`.
///
/// A freshly compiled table is saved back to `cache_path`. A failed save is
/// logged and otherwise ignored.
pub fn load_table(
    modules: &[RouteModule],
    cache_path: Option<&Path>,
) -> anyhow::Result<(RouteTable, TableSource)> {
    let fingerprint = Fingerprint::of(modules);

    let Some(path) = cache_path else {
        let table = build_app_table(modules).context("Failed to compile route declarations")?;
        return Ok((table, TableSource::CompiledUncached));
    };

    let reason = match route_cache::lookup(path, &fingerprint) {
        CacheLookup::Hit(table) => {
            info!(
                path = %path.display(),
                fingerprint = %fingerprint,
                routes_count = table.len(),
                "Route cache hit"
            );
            return Ok((table, TableSource::Cache));
        }
        CacheLookup::Miss(reason) => reason,
    };

    info!(path = %path.display(), reason = %reason, "Route cache miss, compiling declarations");
    let table = build_app_table(modules).context("Failed to compile route declarations")?;

    match route_cache::save(path, &fingerprint, &table) {
        Ok(()) => info!(path = %path.display(), fingerprint = %fingerprint, "Route cache saved"),
        Err(e) => warn!(
            path = %path.display(),
            error = %e,
            "Failed to save route cache, continuing with in-memory table"
        ),
    }
    Ok((table, TableSource::Compiled(reason)))
}

/// Build the boot snapshot from already discovered modules and log the
/// compiled table.
pub fn boot_modules(modules: &[RouteModule], cache_path: Option<&Path>) -> anyhow::Result<Routes> {
    let (table, source) = load_table(modules, cache_path)?;
    info!(source = %source, modules = modules.len(), "Route table ready");
    table.log_routes();
    Ok(Routes::new(table))
}

/// Full startup pipeline driven by configuration.
pub fn boot(config: &RouteConfig) -> anyhow::Result<Routes> {
    let modules = load_modules(&config.declarations)?;
    boot_modules(&modules, config.effective_cache_path())
}
