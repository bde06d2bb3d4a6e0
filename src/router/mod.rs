//! # Router Module
//!
//! The router module holds the compiled route table and resolves
//! "which handler owns this (method, path)".
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Partitioning compiled entries by HTTP method
//! - Keeping each partition in a total, deterministic match order
//! - Matching incoming requests and extracting path parameters
//! - Composing route sets from independently packaged modules ([`RouteTable::merge`])
//! - Producing new tables for administrative removals
//!
//! ## Match Order
//!
//! Each method partition is sorted ascending by:
//!
//! 1. [`PriorityTier`] - `First` < `Normal` < `Last`
//! 2. [`Specificity`] - fewer dynamic segments first, wildcard patterns last
//! 3. Discovery order - global registration order, assigned by the table
//!
//! Matching walks the partition in that order and stops at the first entry
//! whose pattern matches. Given `articles/:id` and `articles/new`,
//! `GET /articles/new` resolves to `articles/new` and `GET /articles/42`
//! resolves to `articles/:id`.
//!
//! ## HEAD
//!
//! Registering a GET route also registers an implicit HEAD twin. A HEAD
//! request that matches no HEAD entry falls back to the GET partition. Both
//! cases set [`RouteMatch::suppress_body`].
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routemap::declaration::{build_table, RouteModule};
//!
//! let module = RouteModule::new("blog")
//!     .get(["articles/:id"], "ArticlesShow")
//!     .get(["articles/new"], "ArticlesNew")
//!     .first();
//! let table = build_table(&module).unwrap();
//!
//! let m = table.route(&Method::GET, "/articles/new").unwrap();
//! assert_eq!(m.handler.as_str(), "ArticlesNew");
//!
//! let m = table.route(&Method::HEAD, "/articles/42").unwrap();
//! assert_eq!(m.handler.as_str(), "ArticlesShow");
//! assert!(m.suppress_body);
//! ```

mod core;
mod entry;

pub use core::{ParamVec, RouteMatch, RouteTable, MAX_INLINE_PARAMS};
pub use entry::{PriorityTier, RouteEntry, Specificity, SUPPORTED_METHODS};
