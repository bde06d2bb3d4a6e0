use http::Method;
use routemap::declaration::load_modules;
use routemap::hot_reload::watch_declarations;
use routemap::snapshot::{boot_modules, SharedRoutes};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::temp_files;

const DECL_V1: &str = "\
routes:
  - method: GET
    pattern: foo
    handler: FooOne
";

const DECL_V2: &str = "\
routes:
  - method: GET
    pattern: foo
    handler: FooTwo
  - method: GET
    pattern: bar
    handler: Bar
";

fn wait_for(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    false
}

#[test]
fn test_watch_declarations_reload() {
    let path = temp_files::create_temp_yaml(DECL_V1);
    let modules = load_modules(&[path.clone()]).unwrap();
    let shared = Arc::new(SharedRoutes::new(boot_modules(&modules, None).unwrap()));

    let reloads: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let reloads_clone = Arc::clone(&reloads);

    let watcher = watch_declarations(vec![path.clone()], Arc::clone(&shared), None, move |routes| {
        let names = routes
            .table
            .declared_entries()
            .iter()
            .map(|e| e.handler.to_string())
            .collect();
        reloads_clone.lock().unwrap().push(names);
    })
    .expect("watch_declarations");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(&path, DECL_V2).unwrap();
    assert!(wait_for(|| {
        reloads
            .lock()
            .unwrap()
            .iter()
            .any(|v| v.contains(&"FooTwo".to_string()))
    }));
    let routes = shared.load();
    assert_eq!(routes.route(&Method::GET, "/foo").unwrap().handler.as_str(), "FooTwo");
    assert!(routes.route(&Method::GET, "/bar").is_some());

    drop(watcher);
    temp_files::cleanup_temp_files(&[path]);
}
