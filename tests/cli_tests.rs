use std::process::Command;

mod common;
use common::{fixtures, temp_files};

fn routemap() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_routemap"));
    cmd.env("ROUTEMAP_LOG_LEVEL", "error")
        .env_remove("ROUTEMAP_DECLARATIONS")
        .env_remove("ROUTEMAP_CACHE_PATH")
        .env_remove("ROUTEMAP_CACHE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_routes_lists_table() {
    let decl = temp_files::create_temp_yaml(fixtures::BLOG_YAML);
    let output = routemap()
        .arg("--decl")
        .arg(&decl)
        .arg("--no-cache")
        .arg("routes")
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("GET"));
    assert!(first.ends_with("-> ArticlesNew"));
    assert!(stdout.contains("-> NotFoundPage"));
    temp_files::cleanup_temp_files(&[decl]);
}

#[test]
fn test_cli_match_exit_status() {
    let decl = temp_files::create_temp_yaml(
        "routes:\n  - method: GET\n    pattern: articles/:id\n    handler: ArticlesShow\n",
    );

    let output = routemap()
        .args(["match", "--path", "/articles/3", "--no-cache", "--decl"])
        .arg(&decl)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("handler: ArticlesShow"));
    assert!(stdout.contains("param: id=3"));

    let output = routemap()
        .args(["match", "--path", "/nope", "--no-cache", "--decl"])
        .arg(&decl)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    temp_files::cleanup_temp_files(&[decl]);
}

#[test]
fn test_cli_check_fails_on_invalid_pattern() {
    let decl = temp_files::create_temp_yaml(
        "routes:\n  - method: GET\n    pattern: files/:name<[a-z+>\n    handler: FileShow\n",
    );
    let output = routemap()
        .args(["check", "--decl"])
        .arg(&decl)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("FileShow"));
    temp_files::cleanup_temp_files(&[decl]);
}

#[test]
fn test_cli_requires_declarations() {
    let output = routemap().arg("routes").output().expect("run cli");
    assert!(!output.status.success());
}
