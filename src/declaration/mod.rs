//! # Route Declarations
//!
//! The discovery feed: raw `(method, patterns, handler, priority, skip_csrf)`
//! tuples grouped by the module that declares them. Modules come from YAML or
//! JSON declaration files or from builder calls, and compile into a
//! [`RouteTable`](crate::router::RouteTable).
//!
//! ## File format
//!
//! ```yaml
//! name: blog
//! routes:
//!   - method: GET
//!     patterns: ["articles/:id", "articles/:id.:format"]
//!     handler: ArticlesShow
//!   - method: GET
//!     pattern: articles/new
//!     handler: ArticlesNew
//!     priority: first
//!   - method: POST
//!     pattern: webhooks/:source
//!     handler: WebhookReceive
//!     skip_csrf: true
//! ```

mod build;
mod load;
mod types;

pub use build::{build_app_table, build_table, CompileError};
pub use load::{load_module, load_modules};
pub use types::{RouteDeclaration, RouteModule};

pub use crate::router::PriorityTier;
