use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ids::HandlerId;
use crate::pattern::RoutePattern;

/// Methods a route may be declared for, in partition order.
pub const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
    Method::HEAD,
];

pub(crate) fn method_index(method: &Method) -> Option<usize> {
    SUPPORTED_METHODS.iter().position(|m| m == method)
}

/// Explicit ordering tier of a route
///
/// Every `First` entry of a method is tried before every `Normal` entry, and
/// every `Normal` entry before every `Last` entry, regardless of specificity
/// or which module declared them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    First,
    #[default]
    Normal,
    Last,
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityTier::First => write!(f, "first"),
            PriorityTier::Normal => write!(f, "normal"),
            PriorityTier::Last => write!(f, "last"),
        }
    }
}

/// How specific a pattern is; lower sorts (and is tried) first.
///
/// Compared lexicographically: fewer dynamic segments first, then patterns
/// without a wildcard, then patterns with a format discriminator ahead of
/// their format-less twin (`articles/:id.:format` before `articles/:id`, so
/// `articles/42.json` is not swallowed by `:id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    dynamic: usize,
    wildcard: bool,
    no_format: bool,
}

impl Specificity {
    #[must_use]
    pub fn of(pattern: &RoutePattern) -> Self {
        Self {
            dynamic: pattern.dynamic_count(),
            wildcard: pattern.has_wildcard(),
            no_format: pattern.format().is_none(),
        }
    }

    #[must_use]
    pub fn dynamic_segments(&self) -> usize {
        self.dynamic
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// One compiled route: a method, a pattern and the handler that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: Arc<RoutePattern>,
    pub handler: HandlerId,
    pub priority: PriorityTier,
    /// Global registration order, assigned by the table. Final tie-breaker.
    pub discovery_order: u64,
    /// Opt out of anti-forgery token enforcement for mutating requests.
    pub skip_csrf: bool,
    /// HEAD twin generated for a GET registration; dispatch suppresses the body.
    pub implicit_head: bool,
}

impl RouteEntry {
    pub fn new(method: Method, pattern: RoutePattern, handler: impl Into<HandlerId>) -> Self {
        Self {
            method,
            pattern: Arc::new(pattern),
            handler: handler.into(),
            priority: PriorityTier::Normal,
            discovery_order: 0,
            skip_csrf: false,
            implicit_head: false,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: PriorityTier) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_skip_csrf(mut self, skip_csrf: bool) -> Self {
        self.skip_csrf = skip_csrf;
        self
    }

    #[must_use]
    pub fn specificity(&self) -> Specificity {
        Specificity::of(&self.pattern)
    }

    /// Position of this entry within its method partition.
    ///
    /// Explicit HEAD routes sort ahead of implicit HEAD twins of equal tier
    /// and specificity.
    pub(crate) fn sort_key(&self) -> (PriorityTier, Specificity, bool, u64) {
        (
            self.priority,
            self.specificity(),
            self.implicit_head,
            self.discovery_order,
        )
    }
}
