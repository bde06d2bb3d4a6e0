use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use http::Method;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::csrf::CsrfGate;
use crate::declaration::{build_app_table, load_modules};
use crate::runtime_config::RouteConfig;
use crate::snapshot::{load_table, Routes};

/// Command-line interface for routemap
#[derive(Parser, Debug)]
#[command(name = "routemap")]
#[command(about = "Compile, inspect and query declarative route tables", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where declarations and the cache come from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Declaration file (YAML or JSON); repeat to merge several modules in order
    #[arg(long = "decl", value_name = "FILE", global = true)]
    pub declarations: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Route cache file
    #[arg(long, value_name = "FILE", global = true)]
    pub cache: Option<PathBuf>,

    /// Do not read or write the route cache
    #[arg(long, default_value_t = false, global = true)]
    pub no_cache: bool,
}

impl SourceArgs {
    /// Config file, then environment, then flags.
    pub fn resolve(&self) -> anyhow::Result<RouteConfig> {
        let mut config = match &self.config {
            Some(path) => RouteConfig::from_file(path)?,
            None => RouteConfig::default(),
        };
        config.apply_env();

        if !self.declarations.is_empty() {
            config.declarations = self.declarations.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache_path = Some(cache.clone());
        }
        if self.no_cache {
            config.cache_enabled = false;
        }
        if config.declarations.is_empty() {
            bail!("no declaration files given (use --decl, --config or ROUTEMAP_DECLARATIONS)");
        }
        Ok(config)
    }
}

/// Available routemap commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the compiled route table in match order
    Routes,
    /// Resolve a request to its handler and path parameters
    Match {
        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, optionally with a query string
        #[arg(short, long)]
        path: String,
    },
    /// Build the URL of a handler
    Url {
        /// Handler id
        #[arg(long)]
        handler: String,

        /// Argument as NAME=VALUE; repeatable
        #[arg(long = "arg", value_name = "NAME=VALUE", value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },
    /// Compile the declarations and report the first invalid one
    Check,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("invalid argument '{s}', expected NAME=VALUE"))
}

fn parse_method(raw: &str) -> anyhow::Result<Method> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{raw}'"))
}

/// Run one command, writing its output to `out`.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let config = cli.source.resolve()?;
    let modules = load_modules(&config.declarations)?;

    match &cli.command {
        Commands::Check => {
            let table = build_app_table(&modules)?;
            writeln!(
                out,
                "ok: {} modules, {} routes ({} handlers)",
                modules.len(),
                table.len(),
                table.handler_count()
            )?;
        }
        Commands::Routes => {
            let (table, _) = load_table(&modules, config.effective_cache_path())?;
            write!(out, "{}", table.dump_routes())?;
        }
        Commands::Match { method, path } => {
            let method = parse_method(method)?;
            let (table, _) = load_table(&modules, config.effective_cache_path())?;
            let Some(m) = table.route(&method, path) else {
                writeln!(out, "no route matches {method} {path}")?;
                return Ok(ExitCode::FAILURE);
            };
            writeln!(out, "handler: {}", m.handler)?;
            writeln!(out, "pattern: {}", m.entry.pattern)?;
            for (name, value) in &m.path_params {
                writeln!(out, "param: {name}={value}")?;
            }
            writeln!(out, "suppress_body: {}", m.suppress_body)?;
            writeln!(
                out,
                "csrf_check: {}",
                CsrfGate::requires_check(&m.entry, &method)
            )?;
        }
        Commands::Url { handler, args } => {
            let (table, _) = load_table(&modules, config.effective_cache_path())?;
            let routes = Routes::new(table);
            let url = routes.url_for(handler, args.iter().cloned())?;
            writeln!(out, "{url}")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse the process arguments and run the command against stdout.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}
