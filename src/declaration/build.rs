use http::Method;
use std::fmt;
use tracing::{debug, info};

use super::types::RouteModule;
use crate::pattern::{compile_pattern, PatternError};
use crate::router::{RouteEntry, RouteTable, SUPPORTED_METHODS};

/// A declaration that could not be compiled.
///
/// Carries the offending module, method, raw pattern and handler so that a
/// failed boot points straight at the declaration to fix.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Pattern {
        module: String,
        method: Method,
        pattern: String,
        handler: String,
        source: PatternError,
    },
    UnsupportedMethod {
        module: String,
        method: Method,
        handler: String,
    },
    NoPatterns {
        module: String,
        method: Method,
        handler: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Pattern {
                module,
                method,
                pattern,
                handler,
                source,
            } => write!(
                f,
                "invalid route {method} '{pattern}' -> {handler} in module '{module}': {source}"
            ),
            CompileError::UnsupportedMethod {
                module,
                method,
                handler,
            } => write!(
                f,
                "unsupported method {method} for handler {handler} in module '{module}'"
            ),
            CompileError::NoPatterns {
                module,
                method,
                handler,
            } => write!(
                f,
                "route {method} -> {handler} in module '{module}' declares no patterns"
            ),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Pattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Compile one module's declarations into a table.
///
/// Declarations are expanded in order, each pattern becoming one entry, so
/// discovery order follows the declaration file. The first malformed
/// declaration aborts the build.
pub fn build_table(module: &RouteModule) -> Result<RouteTable, CompileError> {
    let mut table = RouteTable::new();
    for declaration in &module.routes {
        let handler = declaration.handler.as_str();
        if !SUPPORTED_METHODS.contains(&declaration.method) {
            return Err(CompileError::UnsupportedMethod {
                module: module.name.clone(),
                method: declaration.method.clone(),
                handler: handler.to_string(),
            });
        }
        if declaration.patterns.is_empty() {
            return Err(CompileError::NoPatterns {
                module: module.name.clone(),
                method: declaration.method.clone(),
                handler: handler.to_string(),
            });
        }

        for raw in &declaration.patterns {
            let pattern = compile_pattern(raw).map_err(|source| CompileError::Pattern {
                module: module.name.clone(),
                method: declaration.method.clone(),
                pattern: raw.clone(),
                handler: handler.to_string(),
                source,
            })?;
            table.register(
                RouteEntry::new(declaration.method.clone(), pattern, declaration.handler.clone())
                    .with_priority(declaration.priority)
                    .with_skip_csrf(declaration.skip_csrf),
            );
        }
    }
    debug!(module = %module.name, routes = table.len(), "Compiled route module");
    Ok(table)
}

/// Compile every module and merge them, in the order given, into one table.
pub fn build_app_table(modules: &[RouteModule]) -> Result<RouteTable, CompileError> {
    let mut app = RouteTable::new();
    for module in modules {
        app.merge(build_table(module)?);
    }
    info!(
        modules = modules.len(),
        routes = app.len(),
        "Compiled application routes"
    );
    Ok(app)
}
