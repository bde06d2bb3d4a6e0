//! Route-level anti-forgery enforcement decision.
//!
//! Token generation and comparison live in the dispatch layer; this module
//! only decides whether a matched request has to present a valid token.

use http::Method;

use crate::router::RouteEntry;

/// Decides whether a request must carry a valid anti-forgery token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsrfGate;

impl CsrfGate {
    /// `true` iff the request method mutates state and the route has not
    /// opted out with `skip_csrf`.
    ///
    /// Safe methods (`GET`, `HEAD`) never require a check, whatever the
    /// route's opt-out flag says.
    ///
    /// ```rust
    /// use http::Method;
    /// use routemap::csrf::CsrfGate;
    /// use routemap::pattern::compile_pattern;
    /// use routemap::router::RouteEntry;
    ///
    /// let entry = RouteEntry::new(Method::POST, compile_pattern("comments").unwrap(), "CommentsCreate");
    /// assert!(CsrfGate::requires_check(&entry, &Method::POST));
    /// assert!(!CsrfGate::requires_check(&entry.with_skip_csrf(true), &Method::POST));
    /// ```
    #[must_use]
    pub fn requires_check(entry: &RouteEntry, method: &Method) -> bool {
        !is_safe(method) && !entry.skip_csrf
    }
}

fn is_safe(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}
