//! # Reverse Routing
//!
//! Builds URLs from a handler id plus named arguments. Every handler has one
//! canonical pattern, the earliest declared one, so reverse lookup never needs
//! the HTTP method.
//!
//! ```rust
//! use routemap::declaration::{build_table, RouteModule};
//! use routemap::reverse::{ReverseError, ReverseIndex};
//!
//! let module = RouteModule::new("blog").get(["articles/:id"], "ArticlesShow");
//! let reverse = ReverseIndex::build(&build_table(&module).unwrap());
//!
//! assert_eq!(reverse.url_for("ArticlesShow", [("id", 5)]).unwrap(), "articles/5");
//! assert!(matches!(
//!     reverse.url_for("ArticlesShow", Vec::<(&str, &str)>::new()),
//!     Err(ReverseError::MissingArgument { .. })
//! ));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::ids::HandlerId;
use crate::pattern::{RoutePattern, Segment, WILDCARD_PARAM};
use crate::router::RouteTable;

/// Errors returned by [`ReverseIndex::url_for`]
///
/// All of them are recoverable: the caller decides how to render a link it
/// could not build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseError {
    /// No route in the table is owned by this handler
    UnknownHandler { handler: String },
    /// The canonical pattern binds `name` but no (non-empty) value was given
    MissingArgument { handler: String, name: String },
    /// `value` does not fully match the constraint of the `name` segment
    RegexViolation {
        handler: String,
        name: String,
        value: String,
        constraint: String,
    },
}

impl fmt::Display for ReverseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReverseError::UnknownHandler { handler } => {
                write!(f, "no route is registered for handler '{handler}'")
            }
            ReverseError::MissingArgument { handler, name } => {
                write!(f, "missing argument '{name}' for handler '{handler}'")
            }
            ReverseError::RegexViolation {
                handler,
                name,
                value,
                constraint,
            } => write!(
                f,
                "argument '{name}'='{value}' for handler '{handler}' does not match <{constraint}>"
            ),
        }
    }
}

impl std::error::Error for ReverseError {}

/// Handler id to canonical pattern.
#[derive(Debug, Clone, Default)]
pub struct ReverseIndex {
    canonical: HashMap<HandlerId, Arc<RoutePattern>>,
}

impl ReverseIndex {
    /// Record, for each handler in `table`, its earliest-declared pattern.
    #[must_use]
    pub fn build(table: &RouteTable) -> Self {
        let mut canonical = HashMap::new();
        for entry in table.declared_entries() {
            canonical
                .entry(entry.handler.clone())
                .or_insert_with(|| Arc::clone(&entry.pattern));
        }
        Self { canonical }
    }

    /// Canonical pattern of `handler`.
    #[must_use]
    pub fn pattern_for(&self, handler: &str) -> Option<&RoutePattern> {
        self.canonical.get(handler).map(Arc::as_ref)
    }

    pub fn handlers(&self) -> impl Iterator<Item = &HandlerId> {
        self.canonical.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Build the URL of `handler` from named arguments.
    ///
    /// Parameter values are URL-encoded. The wildcard argument (named `*`) is
    /// inserted verbatim and may be omitted. Every argument is validated
    /// before anything is substituted. Arguments the pattern does not bind are
    /// appended as a query string, sorted by name.
    ///
    /// The result has a leading `/` iff the canonical pattern was declared
    /// with one.
    pub fn url_for<I, K, V>(&self, handler: &str, args: I) -> Result<String, ReverseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let pattern = self
            .canonical
            .get(handler)
            .ok_or_else(|| ReverseError::UnknownHandler {
                handler: handler.to_string(),
            })?;
        let mut args: BTreeMap<String, String> = args
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        validate(handler, pattern, &args)?;

        let mut pieces: Vec<String> = Vec::with_capacity(pattern.segments().len());
        for segment in pattern.segments() {
            match segment {
                Segment::Static(literal) => pieces.push(literal.clone()),
                Segment::Param(name) | Segment::RegexParam { name, .. } => {
                    let value = args.remove(&**name).unwrap_or_default();
                    pieces.push(urlencoding::encode(&value).into_owned());
                }
                Segment::Wildcard => {
                    let rest = args.remove(WILDCARD_PARAM).unwrap_or_default();
                    if !rest.is_empty() {
                        pieces.push(rest);
                    }
                }
            }
        }
        if let Some(name) = pattern.format() {
            let ext = args.remove(name).unwrap_or_default();
            if let Some(last) = pieces.last_mut() {
                last.push('.');
                last.push_str(&urlencoding::encode(&ext));
            }
        }

        let mut url = String::new();
        if pattern.is_rooted() {
            url.push('/');
        }
        url.push_str(&pieces.join("/"));

        if !args.is_empty() {
            let query: Vec<String> = args
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }
}

fn required<'a>(
    handler: &str,
    args: &'a BTreeMap<String, String>,
    name: &str,
) -> Result<&'a str, ReverseError> {
    match args.get(name) {
        Some(value) if !value.is_empty() => Ok(value.as_str()),
        _ => Err(ReverseError::MissingArgument {
            handler: handler.to_string(),
            name: name.to_string(),
        }),
    }
}

fn validate(
    handler: &str,
    pattern: &RoutePattern,
    args: &BTreeMap<String, String>,
) -> Result<(), ReverseError> {
    for segment in pattern.segments() {
        match segment {
            Segment::Param(name) => {
                required(handler, args, name)?;
            }
            Segment::RegexParam {
                name,
                regex,
                source,
            } => {
                let value = required(handler, args, name)?;
                if !regex.is_match(value) {
                    return Err(ReverseError::RegexViolation {
                        handler: handler.to_string(),
                        name: name.to_string(),
                        value: value.to_string(),
                        constraint: source.clone(),
                    });
                }
            }
            Segment::Static(_) | Segment::Wildcard => {}
        }
    }
    if let Some(name) = pattern.format() {
        required(handler, args, name)?;
    }
    Ok(())
}
