#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Creates a temporary file with a name unique across threads and processes
    pub fn create_temp_file(content: &str, ext: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "routemap_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_file(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_file(content, "json")
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            std::fs::remove_file(path).ok();
        }
    }
}

pub mod fixtures {
    /// A blog module exercising tiers, format twins, regex constraints and CSRF opt-out
    pub const BLOG_YAML: &str = r#"
name: blog
routes:
  - method: GET
    pattern: /
    handler: Home
  - method: GET
    patterns: ["articles/:id<[0-9]+>", "articles/:id<[0-9]+>.:format"]
    handler: ArticlesShow
  - method: GET
    pattern: articles/new
    handler: ArticlesNew
    priority: first
  - method: GET
    pattern: articles/:slug
    handler: ArticlesBySlug
  - method: POST
    pattern: articles
    handler: ArticlesCreate
  - method: PUT
    pattern: articles/:id
    handler: ArticlesUpdate
  - method: DELETE
    pattern: articles/:id
    handler: ArticlesDestroy
  - method: POST
    pattern: webhooks/:source
    handler: WebhookReceive
    skip_csrf: true
  - method: GET
    pattern: service/:id/proxy/:*
    handler: Proxy
  - method: GET
    pattern: :*
    handler: NotFoundPage
    priority: last
"#;

    /// A plugin module merged after the blog
    pub const ADMIN_JSON: &str = r#"{
  "name": "admin",
  "routes": [
    {"method": "GET", "pattern": "admin", "handler": "AdminHome"},
    {"method": "GET", "pattern": "admin/users/:id", "handler": "AdminUserShow"},
    {"method": "HEAD", "pattern": "admin", "handler": "AdminProbe"},
    {"method": "GET", "pattern": "articles/:slug", "handler": "AdminArticlePreview"}
  ]
}"#;
}
