//! # Pattern Module
//!
//! Compiles declared path patterns into typed segments and matches request
//! paths against them.
//!
//! ## Pattern Syntax
//!
//! Patterns are `/`-separated tokens. A leading `/` is optional.
//!
//! | Token            | Segment                        | Matches                                  |
//! |------------------|--------------------------------|------------------------------------------|
//! | `articles`       | [`Segment::Static`]            | exactly `articles`                       |
//! | `:id`            | [`Segment::Param`]             | one non-empty token                      |
//! | `:id<[0-9]+>`    | [`Segment::RegexParam`]        | one token fully matching the regex       |
//! | `:*`             | [`Segment::Wildcard`]          | the rest of the path, `/` included       |
//! | `:id.:format`    | param + format discriminator   | `42.json` → `id=42`, `format=json`       |
//!
//! The wildcard is only allowed as the final segment. Its remainder is
//! reported under the reserved name [`WILDCARD_PARAM`] (`*`).
//!
//! ## Example
//!
//! ```rust
//! use routemap::pattern::{compile_pattern, RequestPath};
//!
//! let pattern = compile_pattern("service/:id/proxy/:*").unwrap();
//! let params = pattern
//!     .match_path(&RequestPath::parse("/service/123/proxy/http://foo.com/bar"))
//!     .unwrap();
//!
//! assert_eq!(params[0].1, "123");
//! assert_eq!(params[1].1, "http://foo.com/bar");
//! ```

mod compile;
mod error;
mod path;
mod segment;
#[cfg(test)]
mod tests;

pub use compile::compile_pattern;
pub use error::PatternError;
pub use path::RequestPath;
pub use segment::{RoutePattern, Segment, WILDCARD_PARAM};
