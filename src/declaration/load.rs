use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use super::types::{RouteDeclaration, RouteModule};

#[derive(Deserialize)]
struct ModuleFile {
    name: Option<String>,
    #[serde(default)]
    routes: Vec<RouteDeclaration>,
}

/// Read one declaration file.
///
/// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON. A file
/// without a `name` takes its file stem as module name.
pub fn load_module(path: impl AsRef<Path>) -> anyhow::Result<RouteModule> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read declaration file {}", path.display()))?;
    let file: ModuleFile = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML declarations in {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON declarations in {}", path.display()))?,
    };

    let name = file.name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(RouteModule {
        name,
        routes: file.routes,
    })
}

/// Read several declaration files, keeping their order.
pub fn load_modules<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Vec<RouteModule>> {
    paths.iter().map(load_module).collect()
}
