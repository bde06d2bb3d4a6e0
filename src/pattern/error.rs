use std::fmt;

/// Malformed route pattern
///
/// Returned by [`compile_pattern`](super::compile_pattern). A pattern error at
/// boot is fatal: the table is never served with a route that failed to compile.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    /// A `:*` wildcard is followed by another segment or a format suffix
    WildcardNotLast,
    /// A `:` token without a name (e.g. `articles/:` or `:<[0-9]+>`)
    EmptyParamName {
        /// The offending token
        token: String,
    },
    /// Parameter names are limited to ASCII letters, digits, `_` and `-`
    ///
    /// This also rejects names containing `/`.
    InvalidParamName {
        /// The rejected name
        name: String,
    },
    /// Two segments, or a segment and the format suffix, bind the same name
    DuplicateParamName {
        /// The repeated name
        name: String,
    },
    /// A `<` regex constraint is never closed by `>`
    UnterminatedRegex {
        /// The offending token
        token: String,
    },
    /// The regex constraint of a parameter does not compile
    InvalidRegex {
        /// Parameter the constraint belongs to
        name: String,
        /// Error reported by the regex engine
        source: regex::Error,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::WildcardNotLast => {
                write!(f, "wildcard `:*` must be the last segment of a pattern")
            }
            PatternError::EmptyParamName { token } => {
                write!(f, "parameter name is empty in token '{token}'")
            }
            PatternError::InvalidParamName { name } => write!(
                f,
                "invalid parameter name '{name}': only ASCII letters, digits, '_' and '-' are allowed"
            ),
            PatternError::DuplicateParamName { name } => {
                write!(f, "parameter name '{name}' is bound more than once")
            }
            PatternError::UnterminatedRegex { token } => {
                write!(f, "regex constraint in token '{token}' is missing its closing '>'")
            }
            PatternError::InvalidRegex { name, source } => {
                write!(f, "regex constraint for parameter '{name}' does not compile: {source}")
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}
