//! # routemap
//!
//! **routemap** compiles declarative HTTP route declarations, collected from
//! independently packaged modules, into one deterministic route table. It
//! answers two questions: "which handler owns this (method, path)" and "what
//! path corresponds to this handler plus these arguments".
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Compiles raw path patterns (`articles/:id<[0-9]+>`, `service/:id/proxy/:*`)
//! - **[`declaration`]** - Route declarations per module, loaded from YAML/JSON or built in code
//! - **[`router`]** - The route table: priority/specificity ordering, matching, merge, removals
//! - **[`reverse`]** - Reverse routing from handler id and arguments to a URL
//! - **[`route_cache`]** - Persisted compiled table keyed by a fingerprint of the declarations
//! - **[`csrf`]** - Per-route anti-forgery enforcement decision
//! - **[`snapshot`]** - Boot pipeline and atomically published immutable snapshots
//! - **[`hot_reload`]** - Rebuild and republish when declaration files change
//! - **[`runtime_config`]** / **[`logging`]** - Configuration and structured logging
//!
//! ### Boot Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Boot as snapshot::boot
//!     participant Decl as declaration
//!     participant Cache as route_cache
//!     participant Table as RouteTable
//!
//!     Boot->>Decl: load_modules(config.declarations)
//!     Boot->>Cache: Fingerprint::of(modules)
//!     Boot->>Cache: lookup(cache_path, fingerprint)
//!     alt Hit
//!         Cache-->>Boot: RouteTable (stored order)
//!     else Miss (absent, stale, corrupt)
//!         Boot->>Decl: build_app_table(modules)
//!         Decl->>Table: register + merge per module
//!         Boot->>Cache: save (failure logged, not fatal)
//!     end
//!     Boot->>Table: log_routes()
//! ```
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routemap::csrf::CsrfGate;
//! use routemap::declaration::RouteModule;
//! use routemap::snapshot::boot_modules;
//!
//! let blog = RouteModule::new("blog")
//!     .get(["articles/:id", "articles/:id.:format"], "ArticlesShow")
//!     .get(["articles/new"], "ArticlesNew")
//!     .first()
//!     .post(["articles"], "ArticlesCreate");
//! let routes = boot_modules(&[blog], None).unwrap();
//!
//! let m = routes.route(&Method::GET, "/articles/42.json").unwrap();
//! assert_eq!(m.handler.as_str(), "ArticlesShow");
//! assert_eq!(m.get_path_param("format"), Some("json"));
//!
//! let m = routes.route(&Method::POST, "/articles").unwrap();
//! assert!(CsrfGate::requires_check(&m.entry, &Method::POST));
//!
//! assert_eq!(routes.url_for("ArticlesShow", [("id", 42)]).unwrap(), "articles/42");
//! ```

pub mod cli;
pub mod csrf;
pub mod declaration;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod pattern;
pub mod reverse;
pub mod route_cache;
pub mod router;
pub mod runtime_config;
pub mod snapshot;

pub use csrf::CsrfGate;
pub use declaration::{build_app_table, build_table, CompileError, RouteDeclaration, RouteModule};
pub use ids::HandlerId;
pub use pattern::{compile_pattern, PatternError, RoutePattern, Segment};
pub use reverse::{ReverseError, ReverseIndex};
pub use router::{PriorityTier, RouteEntry, RouteMatch, RouteTable, Specificity};
pub use runtime_config::RouteConfig;
pub use snapshot::{boot, Routes, SharedRoutes};
