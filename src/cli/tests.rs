//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

const BLOG_YAML: &str = "\
name: blog
routes:
  - method: GET
    pattern: articles/:id
    handler: ArticlesShow
  - method: GET
    pattern: articles/new
    handler: ArticlesNew
  - method: POST
    pattern: articles
    handler: ArticlesCreate
";

fn run(args: &[&str]) -> (anyhow::Result<ExitCode>, String) {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let result = execute(&cli, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn blog_file(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("blog.yaml");
    std::fs::write(&path, BLOG_YAML).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_routes_command_parses_with_global_flags() {
    let cli = Cli::try_parse_from([
        "routemap", "--decl", "a.yaml", "routes", "--decl", "b.yaml", "--no-cache",
    ])
    .unwrap();
    assert_eq!(cli.command, Commands::Routes);
    assert_eq!(
        cli.source.declarations,
        vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
    );
    assert!(cli.source.no_cache);
}

#[test]
fn test_match_command_defaults_to_get() {
    let cli = Cli::try_parse_from(["routemap", "match", "--path", "/articles/1"]).unwrap();
    assert_eq!(
        cli.command,
        Commands::Match {
            method: "GET".to_string(),
            path: "/articles/1".to_string()
        }
    );
}

#[test]
fn test_url_command_collects_args() {
    let cli = Cli::try_parse_from([
        "routemap", "url", "--handler", "ArticlesShow", "--arg", "id=5", "--arg", "q=a=b",
    ])
    .unwrap();
    match cli.command {
        Commands::Url { handler, args } => {
            assert_eq!(handler, "ArticlesShow");
            assert_eq!(
                args,
                vec![
                    ("id".to_string(), "5".to_string()),
                    ("q".to_string(), "a=b".to_string())
                ]
            );
        }
        other => panic!("Expected Url command, got {other:?}"),
    }
}

#[test]
fn test_malformed_arg_rejected() {
    assert!(Cli::try_parse_from(["routemap", "url", "--handler", "H", "--arg", "noequals"]).is_err());
    assert!(Cli::try_parse_from(["routemap", "url", "--handler", "H", "--arg", "=v"]).is_err());
}

#[test]
fn test_all_commands_parse() {
    for args in [
        vec!["routemap", "routes"],
        vec!["routemap", "check", "--config", "routemap.toml"],
        vec!["routemap", "match", "-m", "post", "-p", "/articles"],
        vec!["routemap", "url", "--handler", "ArticlesIndex"],
    ] {
        assert!(Cli::try_parse_from(args.iter().copied()).is_ok(), "failed to parse {args:?}");
    }
}

#[test]
fn test_execute_routes_prints_match_order() {
    let dir = tempfile::tempdir().unwrap();
    let decl = blog_file(&dir);
    let (result, out) = run(&["routemap", "--decl", &decl, "--no-cache", "routes"]);
    assert!(result.is_ok());

    let handlers: Vec<&str> = out
        .lines()
        .filter_map(|l| l.rsplit(" -> ").next())
        .collect();
    assert_eq!(
        handlers,
        vec!["ArticlesNew", "ArticlesShow", "ArticlesCreate", "ArticlesNew", "ArticlesShow"]
    );
}

#[test]
fn test_execute_match() {
    let dir = tempfile::tempdir().unwrap();
    let decl = blog_file(&dir);

    let (result, out) = run(&[
        "routemap", "--decl", &decl, "--no-cache", "match", "-m", "post", "-p", "/articles",
    ]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(out.contains("handler: ArticlesCreate"));
    assert!(out.contains("csrf_check: true"));

    let (result, out) = run(&[
        "routemap", "--decl", &decl, "--no-cache", "match", "-m", "HEAD", "-p", "/articles/7",
    ]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert!(out.contains("param: id=7"));
    assert!(out.contains("suppress_body: true"));

    let (result, out) = run(&["routemap", "--decl", &decl, "--no-cache", "match", "-p", "/nope"]);
    assert_eq!(result.unwrap(), ExitCode::FAILURE);
    assert!(out.contains("no route matches GET /nope"));
}

#[test]
fn test_execute_url_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    let decl = blog_file(&dir);
    let cache = dir.path().join("cache/routes.json");
    let cache = cache.to_string_lossy();

    let (result, out) = run(&[
        "routemap", "--decl", &decl, "--cache", &cache, "url", "--handler", "ArticlesShow",
        "--arg", "id=5",
    ]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out.trim(), "articles/5");
    assert!(dir.path().join("cache/routes.json").exists());

    let (result, _) = run(&[
        "routemap", "--decl", &decl, "--no-cache", "url", "--handler", "ArticlesShow",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_execute_check_reports_invalid_declaration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(
        &path,
        "routes:\n  - method: GET\n    pattern: files/:*/raw\n    handler: FileRaw\n",
    )
    .unwrap();
    let decl = path.to_string_lossy();

    let (result, _) = run(&["routemap", "--decl", &decl, "check"]);
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("files/:*/raw"));
    assert!(message.contains("FileRaw"));

    let good = blog_file(&dir);
    let (result, out) = run(&["routemap", "--decl", &good, "check"]);
    assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out.trim_end(), "ok: 1 modules, 5 routes (3 handlers)");
}
