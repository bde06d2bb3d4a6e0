use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Name under which a wildcard's captured remainder is reported.
pub const WILDCARD_PARAM: &str = "*";

/// One typed element of a compiled [`RoutePattern`].
#[derive(Debug, Clone)]
pub enum Segment {
    /// Literal token, compared byte for byte
    Static(String),
    /// `:name`, matches exactly one non-empty token
    Param(Arc<str>),
    /// `:name<regex>`, matches one token that fully matches `regex`
    RegexParam {
        name: Arc<str>,
        /// Anchored form of `source`
        regex: Regex,
        /// The constraint as written in the pattern
        source: String,
    },
    /// `:*`, consumes the rest of the path including embedded `/`
    Wildcard,
}

impl Segment {
    /// Build a regex-constrained parameter, anchoring the constraint so it
    /// must cover the whole token.
    pub fn regex_param(name: &str, source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Segment::RegexParam {
            name: Arc::from(name),
            regex,
            source: source.to_string(),
        })
    }

    /// Parameter name bound by this segment, if any.
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Param(name) | Segment::RegexParam { name, .. } => Some(&**name),
            Segment::Wildcard => Some(WILDCARD_PARAM),
            Segment::Static(_) => None,
        }
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }
}

// Regex has no equality; two constraints are equal when written the same way.
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Segment::Static(a), Segment::Static(b)) => a == b,
            (Segment::Param(a), Segment::Param(b)) => a == b,
            (
                Segment::RegexParam {
                    name: a, source: sa, ..
                },
                Segment::RegexParam {
                    name: b, source: sb, ..
                },
            ) => a == b && sa == sb,
            (Segment::Wildcard, Segment::Wildcard) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(literal) => f.write_str(literal),
            Segment::Param(name) => write!(f, ":{name}"),
            Segment::RegexParam { name, source, .. } => write!(f, ":{name}<{source}>"),
            Segment::Wildcard => f.write_str(":*"),
        }
    }
}

/// A compiled path pattern.
///
/// Ordered segments plus an optional trailing format discriminator: the
/// `.:format` of `articles/:id.:format`. The discriminator binds the text after
/// the last `.` of the final path token, which lets `articles/:id.:format` and
/// `articles/:id` coexist for one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    format: Option<Arc<str>>,
}

impl RoutePattern {
    pub(crate) fn from_parts(raw: String, segments: Vec<Segment>, format: Option<Arc<str>>) -> Self {
        Self {
            raw,
            segments,
            format,
        }
    }

    /// The pattern string as declared.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Name bound by the format discriminator, if the pattern has one.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub(crate) fn format_name(&self) -> Option<&Arc<str>> {
        self.format.as_ref()
    }

    /// Whether the pattern was declared with a leading `/`.
    ///
    /// Matching ignores the leading slash; URL building reproduces it.
    #[must_use]
    pub fn is_rooted(&self) -> bool {
        self.raw.starts_with('/')
    }

    /// Number of `Param`, `RegexParam` and `Wildcard` segments.
    #[must_use]
    pub fn dynamic_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_dynamic()).count()
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    /// Leading run of static literals, e.g. `["admin", "users"]` for
    /// `admin/users/:id`.
    pub fn static_prefix(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map_while(|s| match s {
            Segment::Static(literal) => Some(literal.as_str()),
            _ => None,
        })
    }

    /// Names of every parameter the pattern binds, in path order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter_map(Segment::param_name)
            .chain(self.format.as_deref())
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
