use http::Method;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::ids::HandlerId;
use crate::router::{PriorityTier, SUPPORTED_METHODS};

/// One raw route declaration as produced by discovery.
///
/// Each pattern expands to its own route entry; all of them share `handler`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDeclaration {
    #[serde(
        serialize_with = "serialize_method",
        deserialize_with = "deserialize_method"
    )]
    pub method: Method,
    #[serde(alias = "pattern", deserialize_with = "one_or_many")]
    pub patterns: Vec<String>,
    pub handler: HandlerId,
    #[serde(default)]
    pub priority: PriorityTier,
    #[serde(default)]
    pub skip_csrf: bool,
}

impl RouteDeclaration {
    pub fn new<P, S>(method: Method, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            patterns: patterns.into_iter().map(Into::into).collect(),
            handler: handler.into(),
            priority: PriorityTier::Normal,
            skip_csrf: false,
        }
    }
}

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

fn deserialize_method<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let method = Method::from_str(&raw.to_ascii_uppercase()).map_err(serde::de::Error::custom)?;
    if !SUPPORTED_METHODS.contains(&method) {
        return Err(serde::de::Error::custom(format!(
            "unsupported method '{raw}', expected one of GET, POST, PUT, PATCH, DELETE, OPTIONS, HEAD"
        )));
    }
    Ok(method)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}

/// The declarations of one independently packaged module, in declaration order.
///
/// Built from a declaration file with [`load_module`](super::load_module) or
/// programmatically:
///
/// ```rust
/// use routemap::declaration::RouteModule;
///
/// let module = RouteModule::new("blog")
///     .get(["articles/:id", "articles/:id.:format"], "ArticlesShow")
///     .post(["articles"], "ArticlesCreate")
///     .get(["articles/new"], "ArticlesNew")
///     .first();
/// assert_eq!(module.routes.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteModule {
    pub name: String,
    #[serde(default)]
    pub routes: Vec<RouteDeclaration>,
}

impl RouteModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn declare(mut self, declaration: RouteDeclaration) -> Self {
        self.routes.push(declaration);
        self
    }

    #[must_use]
    pub fn route<P, S>(self, method: Method, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(RouteDeclaration::new(method, patterns, handler))
    }

    #[must_use]
    pub fn get<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::GET, patterns, handler)
    }

    #[must_use]
    pub fn post<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::POST, patterns, handler)
    }

    #[must_use]
    pub fn put<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::PUT, patterns, handler)
    }

    #[must_use]
    pub fn patch<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::PATCH, patterns, handler)
    }

    #[must_use]
    pub fn delete<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::DELETE, patterns, handler)
    }

    #[must_use]
    pub fn options<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::OPTIONS, patterns, handler)
    }

    #[must_use]
    pub fn head<P, S>(self, patterns: P, handler: impl Into<HandlerId>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(Method::HEAD, patterns, handler)
    }

    /// Put the most recently added declaration in the `First` tier.
    #[must_use]
    pub fn first(self) -> Self {
        self.modify_last(|d| d.priority = PriorityTier::First)
    }

    /// Put the most recently added declaration in the `Last` tier.
    #[must_use]
    pub fn last(self) -> Self {
        self.modify_last(|d| d.priority = PriorityTier::Last)
    }

    /// Exempt the most recently added declaration from anti-forgery checks.
    #[must_use]
    pub fn skip_csrf(self) -> Self {
        self.modify_last(|d| d.skip_csrf = true)
    }

    fn modify_last(mut self, f: impl FnOnce(&mut RouteDeclaration)) -> Self {
        if let Some(declaration) = self.routes.last_mut() {
            f(declaration);
        }
        self
    }

    /// Number of route entries the module expands to, implicit HEAD twins excluded.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.routes.iter().map(|d| d.patterns.len()).sum()
    }
}
