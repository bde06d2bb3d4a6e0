//! # Hot Reload Module
//!
//! Watches declaration files and publishes a rebuilt route snapshot when one
//! of them changes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use routemap::hot_reload::watch_declarations;
//! use routemap::runtime_config::RouteConfig;
//! use routemap::snapshot::{boot, SharedRoutes};
//! use std::sync::Arc;
//!
//! let config = RouteConfig::from_env();
//! let shared = Arc::new(SharedRoutes::new(boot(&config)?));
//!
//! let _watcher = watch_declarations(
//!     config.declarations.clone(),
//!     Arc::clone(&shared),
//!     config.effective_cache_path().map(|p| p.to_path_buf()),
//!     |routes| println!("Reloaded {} routes", routes.table.len()),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - a modify or create event on a watched file
//! 2. **Discovery** - every declaration file is read again, in order
//! 3. **Compile** - the table is restored from cache or compiled, and cached
//! 4. **Publish** - the new snapshot replaces the old one as a whole
//! 5. **Hook** - `on_reload` receives the published snapshot
//!
//! ## Error Handling
//!
//! If a file fails to parse or a declaration fails to compile, the error is
//! logged and the previous snapshot keeps serving.

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::declaration::load_modules;
use crate::snapshot::{load_table, Routes, SharedRoutes};

/// Rebuild the snapshot from `paths` and publish it.
pub fn reload(
    paths: &[PathBuf],
    shared: &SharedRoutes,
    cache_path: Option<&std::path::Path>,
) -> anyhow::Result<Arc<Routes>> {
    let modules = load_modules(paths)?;
    let (table, source) = load_table(&modules, cache_path)?;
    info!(
        source = %source,
        routes_count = table.len(),
        "hot-reload: applying route updates"
    );
    shared.publish(Routes::new(table));
    Ok(shared.load())
}

/// Watch declaration files and republish the routes when they change.
///
/// The returned watcher must be kept alive for as long as reloading is
/// wanted; dropping it stops the watch.
pub fn watch_declarations<F>(
    paths: Vec<PathBuf>,
    shared: Arc<SharedRoutes>,
    cache_path: Option<PathBuf>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    F: FnMut(&Routes) + Send + 'static,
{
    let watch_paths = paths.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload(&watch_paths, &shared, cache_path.as_deref()) {
                        Ok(routes) => on_reload(&routes),
                        Err(e) => error!(
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous routes"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    for path in &paths {
        watcher.watch(path, RecursiveMode::NonRecursive)?;
    }
    info!(files = paths.len(), "hot-reload: watching declaration files");
    Ok(watcher)
}
