use std::collections::HashSet;
use std::sync::Arc;

use super::error::PatternError;
use super::segment::{RoutePattern, Segment};

/// Compile a raw pattern string into a [`RoutePattern`].
///
/// The pattern is split on `/` (a `/` inside a `<...>` regex constraint does
/// not split). Empty tokens are ignored, so `"/articles/:id"` and
/// `"articles/:id/"` compile to the same segments. Each token becomes:
///
/// - `:*` → [`Segment::Wildcard`], only as the last token
/// - `:name<regex>` → [`Segment::RegexParam`]
/// - `:name` → [`Segment::Param`]
/// - anything else → [`Segment::Static`]
///
/// A trailing `.:name` on the last token (`articles/:id.:format`) becomes the
/// pattern's format discriminator.
///
/// # Example
///
/// ```rust
/// use routemap::pattern::{compile_pattern, Segment};
///
/// let pattern = compile_pattern("service/:id/proxy/:*").unwrap();
/// assert_eq!(pattern.segments().len(), 4);
/// assert_eq!(pattern.segments()[3], Segment::Wildcard);
/// ```
pub fn compile_pattern(raw: &str) -> Result<RoutePattern, PatternError> {
    let tokens = split_tokens(raw)?;
    let last = tokens.len().saturating_sub(1);

    let mut segments = Vec::with_capacity(tokens.len());
    let mut format: Option<Arc<str>> = None;

    for (i, token) in tokens.iter().enumerate() {
        if matches!(segments.last(), Some(Segment::Wildcard)) {
            return Err(PatternError::WildcardNotLast);
        }

        let mut token = *token;
        if i == last {
            if let Some((head, name)) = split_format_suffix(token) {
                format = Some(Arc::from(validate_name(name, token)?));
                token = head;
            }
        }
        segments.push(compile_token(token)?);
    }

    if format.is_some() && matches!(segments.last(), Some(Segment::Wildcard)) {
        return Err(PatternError::WildcardNotLast);
    }

    let mut seen = HashSet::new();
    let names = segments
        .iter()
        .filter_map(Segment::param_name)
        .chain(format.as_deref());
    for name in names {
        if !seen.insert(name) {
            return Err(PatternError::DuplicateParamName {
                name: name.to_string(),
            });
        }
    }

    Ok(RoutePattern::from_parts(raw.to_string(), segments, format))
}

/// Visit every char of `raw` that lies outside a `:name<...>` constraint.
///
/// A `<` opens a constraint only in a token that starts with `:`. Inside a
/// constraint, `\` escapes the next char and `[...]` classes are skipped, so a
/// `>` or `/` in a class neither closes the constraint nor splits the token.
/// Returns `false` when a constraint is still open at the end of `raw`.
fn scan_outside_regex(raw: &str, mut visit: impl FnMut(usize, char)) -> bool {
    let mut depth = 0usize;
    let mut class = 0usize;
    let mut token_is_param = false;
    let mut at_token_start = true;

    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if depth > 0 {
            match c {
                '\\' => {
                    chars.next();
                }
                '[' => class += 1,
                ']' if class > 0 => class -= 1,
                '<' if class == 0 => depth += 1,
                '>' if class == 0 => depth -= 1,
                _ => {}
            }
            continue;
        }

        if at_token_start {
            token_is_param = c == ':';
        }
        at_token_start = c == '/';
        if c == '<' && token_is_param {
            depth = 1;
            class = 0;
            continue;
        }
        visit(i, c);
    }
    depth == 0
}

/// Split on `/` outside of regex constraints and drop empty tokens.
fn split_tokens(raw: &str) -> Result<Vec<&str>, PatternError> {
    let mut tokens = Vec::new();
    let mut start = 0;

    let closed = scan_outside_regex(raw, |i, c| {
        if c == '/' {
            if i > start {
                tokens.push(&raw[start..i]);
            }
            start = i + 1;
        }
    });

    if !closed {
        return Err(PatternError::UnterminatedRegex {
            token: raw[start..].to_string(),
        });
    }
    if start < raw.len() {
        tokens.push(&raw[start..]);
    }
    Ok(tokens)
}

/// Find a trailing `.:name` outside of any regex constraint.
fn split_format_suffix(token: &str) -> Option<(&str, &str)> {
    let mut found = None;
    scan_outside_regex(token, |i, c| {
        if c == '.' && token[i + 1..].starts_with(':') {
            found = Some(i);
        }
    });
    let i = found?;
    let head = &token[..i];
    if head.is_empty() {
        return None;
    }
    Some((head, &token[i + 2..]))
}

fn compile_token(token: &str) -> Result<Segment, PatternError> {
    let Some(body) = token.strip_prefix(':') else {
        return Ok(Segment::Static(token.to_string()));
    };

    if body == "*" {
        return Ok(Segment::Wildcard);
    }

    match body.find('<') {
        Some(open) => {
            let name = validate_name(&body[..open], token)?;
            let source = body[open + 1..]
                .strip_suffix('>')
                .ok_or_else(|| PatternError::UnterminatedRegex {
                    token: token.to_string(),
                })?;
            Segment::regex_param(name, source).map_err(|source| PatternError::InvalidRegex {
                name: name.to_string(),
                source,
            })
        }
        None => Ok(Segment::Param(Arc::from(validate_name(body, token)?))),
    }
}

fn validate_name<'a>(name: &'a str, token: &str) -> Result<&'a str, PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyParamName {
            token: token.to_string(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(PatternError::InvalidParamName {
            name: name.to_string(),
        });
    }
    Ok(name)
}
