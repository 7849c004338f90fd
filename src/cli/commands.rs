//! CLI command implementations
//!
//! Every command writes its human-facing output to the given writer and
//! returns an [`Outcome`]; errors end the process with status 1.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::args::{Cli, Command, LintArgs, ReportFormat};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_file, write_line};
use crate::lint::{render_text, IgnoreList, LintOptions, LintReport, Linter};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::registry::OutbreakRegistry;
use crate::source::{Fetch, HttpFetcher, Source};

/// Result of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Command succeeded; for `lint`, no violations
    Success,
    /// `lint` completed and found violations
    LintFailed,
}

impl Outcome {
    /// Process exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::LintFailed => 2,
        }
    }
}

/// Configuration and registry shared by all commands
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub registry: OutbreakRegistry,
}

impl Context {
    /// Loads the configuration, then the registry.
    ///
    /// A `--registry` flag wins over the configuration file, which wins over
    /// the built-in outbreaks.
    pub fn load(config_path: Option<&Path>, registry_path: Option<&Path>) -> CliResult<Self> {
        let config = Config::load_or_default(config_path)?;
        let registry = match registry_path.or(config.registry.as_deref()) {
            Some(path) => OutbreakRegistry::load(path)?,
            None => OutbreakRegistry::builtin(),
        };
        Ok(Self { config, registry })
    }

    fn fetcher(&self) -> CliResult<HttpFetcher> {
        Ok(HttpFetcher::with_timeout(self.config.http_timeout_secs)?)
    }
}

/// Minimum log severity for a `-v` count
pub fn severity_for(verbose: u8) -> Severity {
    match verbose {
        0 => Severity::Warn,
        1 => Severity::Info,
        _ => Severity::Trace,
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<Outcome> {
    let cli = Cli::parse_args();
    Logger::set_min_severity(severity_for(cli.verbose));

    let ctx = Context::load(cli.config.as_deref(), cli.registry.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&ctx, cli.command, &mut out)
}

/// Run the appropriate command based on CLI args
pub fn run_command<W: Write>(ctx: &Context, cmd: Command, out: &mut W) -> CliResult<Outcome> {
    match cmd {
        Command::List => list(ctx, out),
        Command::Get { outbreak, output } => {
            let fetcher = ctx.fetcher()?;
            get(ctx, &fetcher, &outbreak, output.as_deref(), out)
        }
        Command::Lint(args) => {
            let fetcher = ctx.fetcher()?;
            lint(ctx, &fetcher, &args, out)
        }
    }
}

/// Print every registered outbreak
pub fn list<W: Write>(ctx: &Context, out: &mut W) -> CliResult<Outcome> {
    for (name, info) in ctx.registry.iter() {
        write_line(out, &format!("{}: {} [{}]", name, info.description, info.id))?;
    }
    Ok(Outcome::Success)
}

/// Download the latest linelist of `outbreak`
///
/// Writes to `output`, or `<outbreak>.csv` in the working directory.
pub fn get<W: Write>(
    ctx: &Context,
    fetcher: &dyn Fetch,
    outbreak: &str,
    output: Option<&Path>,
    out: &mut W,
) -> CliResult<Outcome> {
    let info = ctx.registry.require(outbreak)?;
    let url = info.url.as_deref().ok_or_else(|| {
        CliError::usage_error(format!("outbreak '{}' has no linelist URL", outbreak))
    })?;

    let bytes = Source::parse(url).read(fetcher)?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", outbreak)));
    write_file(&path, &bytes)?;

    let size = bytes.len().to_string();
    let shown = path.display().to_string();
    log_event_with_fields(
        Event::DatasetWritten,
        &[("bytes", &size), ("outbreak", outbreak), ("path", &shown)],
    );
    write_line(out, &format!("get: wrote {} to {}", outbreak, shown))?;
    Ok(Outcome::Success)
}

/// Locations a lint run reads from
#[derive(Debug, Clone, PartialEq, Eq)]
struct LintTarget {
    label: String,
    data: String,
    schema: String,
}

fn resolve_target(ctx: &Context, args: &LintArgs) -> CliResult<LintTarget> {
    let info = args
        .outbreak
        .as_deref()
        .map(|name| ctx.registry.require(name))
        .transpose()?;

    let data = args
        .data
        .clone()
        .or_else(|| info.and_then(|i| i.url.clone()));
    let schema = args
        .schema
        .clone()
        .or_else(|| info.and_then(|i| i.schema.clone()));

    match (args.outbreak.as_deref(), data, schema) {
        (outbreak, Some(data), Some(schema)) => Ok(LintTarget {
            label: outbreak.unwrap_or(&data).to_string(),
            data,
            schema,
        }),
        (Some(name), None, _) => Err(CliError::usage_error(format!(
            "outbreak '{}' has no linelist URL, pass --data",
            name
        ))),
        (Some(name), _, None) => Err(CliError::usage_error(format!(
            "outbreak '{}' has no schema, pass --schema",
            name
        ))),
        (None, _, _) => Err(CliError::usage_error(
            "give an outbreak name, or both --data and --schema",
        )),
    }
}

/// Lint a linelist against its schema and print the report
pub fn lint<W: Write>(
    ctx: &Context,
    fetcher: &dyn Fetch,
    args: &LintArgs,
    out: &mut W,
) -> CliResult<Outcome> {
    let target = resolve_target(ctx, args)?;
    let options = LintOptions {
        ignore: IgnoreList::parse(&args.ignore),
        id_column: args.id_column.clone().or_else(|| ctx.config.id_column.clone()),
    };

    let linter = Linter::with_options(fetcher, options);
    let (schema, dataset) =
        linter.load(&Source::parse(&target.data), &Source::parse(&target.schema))?;
    let result = linter.check(&schema, &dataset);

    match args.format {
        ReportFormat::Text => {
            let verdict = if result.ok() { "succeeded" } else { "failed" };
            write_line(out, &format!("lint: {} for {}", verdict, target.label))?;
            write_line(out, &render_text(&result))?;
        }
        ReportFormat::Json => {
            let report = LintReport::new(
                target.label.as_str(),
                target.schema.as_str(),
                Some(dataset.content_hash().to_string()),
                &result,
            );
            write_line(out, &report.to_json()?)?;
        }
    }

    Ok(if result.ok() {
        Outcome::Success
    } else {
        Outcome::LintFailed
    })
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use crate::registry::OutbreakInfo;
    use crate::source::{FetchError, FetchResult};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    struct StaticFetcher(&'static [u8]);

    impl Fetch for StaticFetcher {
        fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
            if url.ends_with("missing.csv") {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                });
            }
            Ok(self.0.to_vec())
        }
    }

    const NO_NETWORK: StaticFetcher = StaticFetcher(b"");

    fn schema_json() -> serde_json::Value {
        json!({
            "schema_id": "test",
            "fields": [
                {"name": "ID", "type": "string", "required": true},
                {"name": "Age", "type": "integer", "min": 0, "max": 120},
                {"name": "Outcome", "type": "enum", "values": ["recovered", "death"]}
            ]
        })
    }

    /// Writes a schema and a linelist, and registers them as outbreak `test`.
    fn setup(dir: &TempDir, csv: &str) -> Context {
        let schema = dir.path().join("schema.json");
        let data = dir.path().join("cases.csv");
        fs::write(&schema, schema_json().to_string()).unwrap();
        fs::write(&data, csv).unwrap();

        let mut outbreaks = BTreeMap::new();
        outbreaks.insert(
            "test".to_string(),
            OutbreakInfo {
                id: "GHL-TEST".into(),
                description: "Test outbreak".into(),
                schema: Some(schema.display().to_string()),
                url: Some(data.display().to_string()),
            },
        );
        Context {
            config: Config::default(),
            registry: OutbreakRegistry::new(outbreaks).unwrap(),
        }
    }

    fn lint_args(outbreak: &str) -> LintArgs {
        LintArgs {
            outbreak: Some(outbreak.to_string()),
            ..LintArgs::default()
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_severity_for() {
        assert_eq!(severity_for(0), Severity::Warn);
        assert_eq!(severity_for(1), Severity::Info);
        assert_eq!(severity_for(5), Severity::Trace);
    }

    #[test]
    fn test_list() {
        let ctx = Context::load(None, None).unwrap();
        let mut buf = Vec::new();
        assert_eq!(list(&ctx, &mut buf).unwrap(), Outcome::Success);

        let text = output(buf);
        assert!(text.contains("marburg: Marburg 2023 Equatorial Guinea [GHL2023.D11.1D60.1]"));
        assert!(text.contains("mpox-2024: Mpox 2024 [GHL2024.D11.1E71]"));
    }

    #[test]
    fn test_lint_succeeds() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome\n1,34,recovered\n2,,death\n");

        let mut buf = Vec::new();
        let outcome = lint(&ctx, &NO_NETWORK, &lint_args("test"), &mut buf).unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(output(buf), "lint: succeeded for test\nno issues found\n");
    }

    #[test]
    fn test_lint_fails_with_report() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome\n,150,alive\n");

        let mut buf = Vec::new();
        let outcome = lint(&ctx, &NO_NETWORK, &lint_args("test"), &mut buf).unwrap();
        assert_eq!(outcome, Outcome::LintFailed);
        assert_eq!(outcome.exit_code(), 2);

        let text = output(buf);
        assert!(text.starts_with("lint: failed for test\n3 issue(s) found\n"));
        assert!(text.contains("row 0 field 'ID': MissingRequiredField"));
        assert!(text.contains("row 0 field 'Age': OutOfRange"));
        assert!(text.contains("row 0 field 'Outcome': InvalidEnumValue"));
    }

    #[test]
    fn test_lint_ignore_and_id_column() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome\nC-1,150,alive\n");

        let args = LintArgs {
            ignore: "Outcome".into(),
            id_column: Some("ID".into()),
            ..lint_args("test")
        };
        let mut buf = Vec::new();
        lint(&ctx, &NO_NETWORK, &args, &mut buf).unwrap();

        let text = output(buf);
        assert!(text.contains("1 issue(s) found"));
        assert!(text.contains("row 0 (id C-1) field 'Age'"));
        assert!(!text.contains("Outcome"));
    }

    #[test]
    fn test_lint_json_report() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome,Extra\n1,34,recovered,x\n");

        let args = LintArgs {
            format: ReportFormat::Json,
            ..lint_args("test")
        };
        let mut buf = Vec::new();
        lint(&ctx, &NO_NETWORK, &args, &mut buf).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(report["outbreak"], "test");
        assert_eq!(report["ok"], false);
        assert_eq!(report["errors"][0]["violation_kind"], "UnknownField");
        assert_eq!(report["filehash"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_lint_explicit_sources() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome\n1,34,recovered\n");
        let args = LintArgs {
            data: Some(dir.path().join("cases.csv").display().to_string()),
            schema: Some(dir.path().join("schema.json").display().to_string()),
            ..LintArgs::default()
        };

        let mut buf = Vec::new();
        assert_eq!(lint(&ctx, &NO_NETWORK, &args, &mut buf).unwrap(), Outcome::Success);
        assert!(output(buf).starts_with("lint: succeeded for "));
    }

    #[test]
    fn test_lint_needs_a_target() {
        let ctx = Context::load(None, None).unwrap();
        let err = lint(&ctx, &NO_NETWORK, &LintArgs::default(), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UsageError);
    }

    #[test]
    fn test_lint_outbreak_without_url() {
        let ctx = Context::load(None, None).unwrap();
        let err = lint(&ctx, &NO_NETWORK, &lint_args("marburg"), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UsageError);
        assert!(err.message().contains("--data"));
    }

    #[test]
    fn test_lint_unknown_outbreak() {
        let ctx = Context::load(None, None).unwrap();
        let err = lint(&ctx, &NO_NETWORK, &lint_args("ebola"), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::RegistryError);
        assert!(err.message().contains("marburg, mpox-2024"));
    }

    #[test]
    fn test_lint_load_failure() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir, "ID,Age,Outcome\n1,34,recovered\n");
        fs::write(dir.path().join("schema.json"), "{ not json").unwrap();

        let err = lint(&ctx, &NO_NETWORK, &lint_args("test"), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::LoadFailed);
        assert!(err.message().starts_with("cannot load schema"));
    }

    #[test]
    fn test_get_writes_file() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::load(None, None).unwrap();
        let target = dir.path().join("mpox.csv");
        let fetcher = StaticFetcher(b"ID\n1\n");

        let mut buf = Vec::new();
        get(&ctx, &fetcher, "mpox-2024", Some(&target), &mut buf).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"ID\n1\n");
        assert!(output(buf).starts_with("get: wrote mpox-2024 to "));
    }

    #[test]
    fn test_get_without_url() {
        let ctx = Context::load(None, None).unwrap();
        let err = get(&ctx, &NO_NETWORK, "marburg", None, &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UsageError);
    }

    #[test]
    fn test_get_fetch_failure() {
        let dir = TempDir::new().unwrap();
        let mut outbreaks = BTreeMap::new();
        outbreaks.insert(
            "gone".to_string(),
            OutbreakInfo {
                id: "X".into(),
                description: "gone".into(),
                schema: None,
                url: Some("https://example.org/missing.csv".into()),
            },
        );
        let ctx = Context {
            config: Config::default(),
            registry: OutbreakRegistry::new(outbreaks).unwrap(),
        };

        let target = dir.path().join("gone.csv");
        let err = get(&ctx, &NO_NETWORK, "gone", Some(&target), &mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::FetchFailed);
        assert!(!target.exists());
    }

    #[test]
    fn test_context_registry_from_config() {
        let dir = TempDir::new().unwrap();
        let registry = dir.path().join("outbreaks.json");
        fs::write(
            &registry,
            json!({"h5n1": {"id": "H", "description": "H5N1"}}).to_string(),
        )
        .unwrap();
        let config = dir.path().join("olm.json");
        fs::write(&config, json!({"registry": registry}).to_string()).unwrap();

        let ctx = Context::load(Some(&config), None).unwrap();
        assert_eq!(ctx.registry.names().collect::<Vec<_>>(), vec!["h5n1"]);
    }
}
