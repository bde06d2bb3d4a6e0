use super::{compile_pattern, PatternError, RequestPath, Segment};
use std::sync::Arc;

fn params_of(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let pattern = compile_pattern(pattern).unwrap();
    pattern
        .match_path(&RequestPath::parse(path))
        .map(|p| p.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_classifies_tokens() {
    let pattern = compile_pattern("articles/:id<[0-9]+>/comments/:cid/:*").unwrap();
    let segments = pattern.segments();
    assert_eq!(segments[0], Segment::Static("articles".to_string()));
    assert_eq!(segments[1], Segment::regex_param("id", "[0-9]+").unwrap());
    assert_eq!(segments[2], Segment::Static("comments".to_string()));
    assert_eq!(segments[3], Segment::Param(Arc::from("cid")));
    assert_eq!(segments[4], Segment::Wildcard);
    assert_eq!(pattern.dynamic_count(), 3);
    assert!(pattern.has_wildcard());
}

#[test]
fn test_leading_and_trailing_slashes_ignored() {
    let a = compile_pattern("/articles/:id").unwrap();
    let b = compile_pattern("articles/:id/").unwrap();
    assert_eq!(a.segments(), b.segments());
    assert!(a.is_rooted());
    assert!(!b.is_rooted());
}

#[test]
fn test_root_pattern_has_no_segments() {
    let pattern = compile_pattern("").unwrap();
    assert!(pattern.segments().is_empty());
    assert_eq!(params_of("", "/"), Some(vec![]));
    assert_eq!(params_of("/", ""), Some(vec![]));
    assert_eq!(params_of("", "/articles"), None);
}

#[test]
fn test_regex_may_contain_slash() {
    let pattern = compile_pattern("files/:name<[a-z]+/[a-z]+>").unwrap();
    assert_eq!(pattern.segments().len(), 2);
}

#[test]
fn test_wildcard_not_last() {
    assert_eq!(
        compile_pattern("service/:*/proxy"),
        Err(PatternError::WildcardNotLast)
    );
    assert_eq!(
        compile_pattern("service/:*.:format"),
        Err(PatternError::WildcardNotLast)
    );
}

#[test]
fn test_empty_param_name() {
    assert!(matches!(
        compile_pattern("articles/:"),
        Err(PatternError::EmptyParamName { .. })
    ));
    assert!(matches!(
        compile_pattern("articles/:<[0-9]+>"),
        Err(PatternError::EmptyParamName { .. })
    ));
    assert!(matches!(
        compile_pattern("articles/:id.:"),
        Err(PatternError::EmptyParamName { .. })
    ));
}

#[test]
fn test_invalid_param_name() {
    assert_eq!(
        compile_pattern("articles/:id$"),
        Err(PatternError::InvalidParamName {
            name: "id$".to_string()
        })
    );
    // A format suffix is only recognised on the last token.
    assert!(matches!(
        compile_pattern("articles/:id.:format/comments"),
        Err(PatternError::InvalidParamName { .. })
    ));
}

#[test]
fn test_unterminated_regex() {
    assert!(matches!(
        compile_pattern("articles/:id<[0-9]+"),
        Err(PatternError::UnterminatedRegex { .. })
    ));
}

#[test]
fn test_bracket_in_class_does_not_close_regex() {
    // The `>` sits inside an unclosed class, so the constraint never ends.
    assert!(matches!(
        compile_pattern("articles/:id<[0-9+>"),
        Err(PatternError::UnterminatedRegex { .. })
    ));

    let pattern = compile_pattern("files/:p<[>/]+>/raw").unwrap();
    assert_eq!(pattern.segments().len(), 3);
    assert_eq!(pattern.segments()[1], Segment::regex_param("p", "[>/]+").unwrap());
    assert_eq!(params_of("files/:p<[>/]+>/raw", "files/>/raw"), Some(pairs(&[("p", ">")])));

    let escaped = compile_pattern(r"tags/:t<[a\]>]+>").unwrap();
    assert_eq!(escaped.segments()[1], Segment::regex_param("t", r"[a\]>]+").unwrap());
}

#[test]
fn test_angle_bracket_in_static_token() {
    let pattern = compile_pattern("files/a<b").unwrap();
    assert_eq!(
        pattern.segments(),
        &[
            Segment::Static("files".to_string()),
            Segment::Static("a<b".to_string())
        ]
    );
    assert_eq!(params_of("files/a<b", "/files/a<b"), Some(vec![]));

    let pattern = compile_pattern("a>b/:id").unwrap();
    assert_eq!(pattern.segments()[0], Segment::Static("a>b".to_string()));
}

#[test]
fn test_duplicate_param_name() {
    assert_eq!(
        compile_pattern("a/:id/b/:id"),
        Err(PatternError::DuplicateParamName {
            name: "id".to_string()
        })
    );
    assert_eq!(
        compile_pattern("articles/:id<[0-9]+>/x/:id"),
        Err(PatternError::DuplicateParamName {
            name: "id".to_string()
        })
    );
    assert_eq!(
        compile_pattern("articles/:id.:id"),
        Err(PatternError::DuplicateParamName {
            name: "id".to_string()
        })
    );
    assert!(compile_pattern("users/:user_id/posts/:id").is_ok());
}

#[test]
fn test_invalid_regex() {
    let err = compile_pattern("articles/:id<(0-9>").unwrap_err();
    match err {
        PatternError::InvalidRegex { name, .. } => assert_eq!(name, "id"),
        other => panic!("expected InvalidRegex, got {other:?}"),
    }
    assert!(std::error::Error::source(&compile_pattern("a/:x<(>").unwrap_err()).is_some());
}

#[test]
fn test_static_dots_stay_literal() {
    let pattern = compile_pattern("robots.txt").unwrap();
    assert_eq!(pattern.segments(), &[Segment::Static("robots.txt".to_string())]);
    assert_eq!(pattern.format(), None);
    assert_eq!(params_of("robots.txt", "/robots.txt"), Some(vec![]));
}

#[test]
fn test_format_discriminator() {
    let pattern = compile_pattern("articles/:id.:format").unwrap();
    assert_eq!(pattern.format(), Some("format"));
    assert_eq!(pattern.dynamic_count(), 1);
    assert_eq!(
        pattern.param_names().collect::<Vec<_>>(),
        vec!["id", "format"]
    );

    assert_eq!(
        params_of("articles/:id.:format", "articles/42.json"),
        Some(pairs(&[("id", "42"), ("format", "json")]))
    );
    assert_eq!(params_of("articles/:id.:format", "articles/42"), None);
    assert_eq!(params_of("articles/:id.:format", "articles/42."), None);
    assert_eq!(params_of("articles/:id.:format", "articles/.json"), None);
    assert_eq!(
        params_of("articles/:id.:format", "articles/v1.2.json"),
        Some(pairs(&[("id", "v1.2"), ("format", "json")]))
    );
}

#[test]
fn test_static_with_format() {
    assert_eq!(
        params_of("image.:format", "/image.png"),
        Some(pairs(&[("format", "png")]))
    );
    assert_eq!(params_of("image.:format", "/icon.png"), None);
}

#[test]
fn test_param_requires_non_empty_token() {
    assert_eq!(params_of("a/:id/b", "a//b"), None);
    assert_eq!(params_of("articles/:id", "articles/"), None);
}

#[test]
fn test_regex_param_full_match_only() {
    assert_eq!(
        params_of("articles/:id<[0-9]+>", "articles/42"),
        Some(pairs(&[("id", "42")]))
    );
    assert_eq!(params_of("articles/:id<[0-9]+>", "articles/42a"), None);
    assert_eq!(params_of("articles/:id<[0-9]+>", "articles/a42"), None);
}

#[test]
fn test_wildcard_captures_remainder_verbatim() {
    assert_eq!(
        params_of("service/:id/proxy/:*", "service/123/proxy/http://foo.com/bar"),
        Some(pairs(&[("id", "123"), ("*", "http://foo.com/bar")]))
    );
    assert_eq!(
        params_of("service/:id/proxy/:*", "/service/123/proxy/a%20b/"),
        Some(pairs(&[("id", "123"), ("*", "a%20b/")]))
    );
}

#[test]
fn test_wildcard_may_capture_nothing() {
    assert_eq!(
        params_of("service/:id/proxy/:*", "service/123/proxy"),
        Some(pairs(&[("id", "123"), ("*", "")]))
    );
}

#[test]
fn test_params_are_percent_decoded() {
    assert_eq!(
        params_of("users/:name", "users/J%C3%B6rg%20K"),
        Some(pairs(&[("name", "Jörg K")]))
    );
}

#[test]
fn test_query_string_is_not_matched() {
    assert_eq!(
        params_of("articles/:id", "/articles/7?page=2"),
        Some(pairs(&[("id", "7")]))
    );
}

#[test]
fn test_static_prefix() {
    let pattern = compile_pattern("admin/users/:id/edit").unwrap();
    assert_eq!(
        pattern.static_prefix().collect::<Vec<_>>(),
        vec!["admin", "users"]
    );
}

#[test]
fn test_request_path_tokens() {
    assert_eq!(RequestPath::parse("/").len(), 0);
    assert_eq!(RequestPath::parse("/a/b/").len(), 2);
    assert_eq!(RequestPath::parse("a//b").len(), 3);
    assert!(RequestPath::parse("").is_empty());
}
