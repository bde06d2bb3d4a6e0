use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

use super::segment::{RoutePattern, Segment, WILDCARD_PARAM};
use crate::router::ParamVec;

/// A request path split into `/`-separated tokens.
///
/// Tokenized once per request and matched against every candidate entry.
/// One leading `/` run and one trailing `/` are ignored; empty tokens in the
/// middle (`a//b`) are kept so that a wildcard can return its remainder
/// verbatim. Anything after `?` is not part of the path.
#[derive(Debug)]
pub struct RequestPath<'a> {
    path: &'a str,
    /// (byte offset into `path`, token)
    tokens: SmallVec<[(usize, &'a str); 16]>,
}

impl<'a> RequestPath<'a> {
    pub fn parse(path: &'a str) -> Self {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let offset = path.len() - path.trim_start_matches('/').len();
        let body = &path[offset..];

        let mut tokens = SmallVec::new();
        if !body.is_empty() {
            let mut start = offset;
            for token in body.split('/') {
                tokens.push((start, token));
                start += token.len() + 1;
            }
            if tokens.len() > 1 && matches!(tokens.last(), Some((_, ""))) {
                tokens.pop();
            }
        }

        Self { path, tokens }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn token(&self, i: usize) -> Option<&'a str> {
        self.tokens.get(i).map(|(_, t)| *t)
    }

    /// Everything from token `i` to the end of the path, slashes included.
    fn remainder(&self, i: usize) -> &'a str {
        match self.tokens.get(i) {
            Some((start, _)) => &self.path[*start..],
            None => "",
        }
    }
}

fn decode(token: &str) -> String {
    urlencoding::decode(token)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| token.to_string())
}

impl RoutePattern {
    /// Segment-wise match against a tokenized path.
    ///
    /// Returns the extracted parameters on success. `Param` and `RegexParam`
    /// values are percent-decoded (the regex sees the decoded value); the
    /// wildcard remainder is returned as-is under [`WILDCARD_PARAM`].
    #[must_use]
    pub fn match_path(&self, path: &RequestPath<'_>) -> Option<ParamVec> {
        let segments = self.segments();
        let mut params = ParamVec::new();

        for (i, segment) in segments.iter().enumerate() {
            if let Segment::Wildcard = segment {
                params.push((Arc::from(WILDCARD_PARAM), path.remainder(i).to_string()));
                return Some(params);
            }

            let token = path.token(i)?;
            match self.format_name() {
                Some(name) if i + 1 == segments.len() => {
                    let (head, ext) = token.rsplit_once('.')?;
                    if ext.is_empty() {
                        return None;
                    }
                    bind(segment, head, &mut params)?;
                    params.push((Arc::clone(name), decode(ext)));
                }
                _ => bind(segment, token, &mut params)?,
            }
        }

        (path.len() == segments.len()).then_some(params)
    }
}

/// Match one non-wildcard segment against one token, recording any parameter.
fn bind(segment: &Segment, token: &str, params: &mut ParamVec) -> Option<()> {
    match segment {
        Segment::Static(literal) => (literal == token).then_some(()),
        Segment::Param(name) => {
            if token.is_empty() {
                return None;
            }
            params.push((Arc::clone(name), decode(token)));
            Some(())
        }
        Segment::RegexParam { name, regex, .. } => {
            if token.is_empty() {
                return None;
            }
            let value = decode(token);
            if !regex.is_match(&value) {
                return None;
            }
            params.push((Arc::clone(name), value));
            Some(())
        }
        Segment::Wildcard => None,
    }
}
