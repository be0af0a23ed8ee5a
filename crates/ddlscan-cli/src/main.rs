use std::error::Error as _;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ddlscan_error::{DdlError, Result};
use ddlscan_parser::{Tokenizer, parse_with_origin};
use ddlscan_schema::DbOrigin;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DDLSCAN_LOG";
const DEFAULT_LOG_FILTER: &str = "info";
const SQL_EXTENSION: &str = "sql";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    input: Option<PathBuf>,
    pretty: bool,
    tokens: bool,
    output_dir: Option<PathBuf>,
    keep_going: bool,
    log_filter: Option<String>,
    log_json: bool,
    show_help: bool,
}

fn main() {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let exit_code = run(std::env::args_os(), &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run<I, W, E>(args: I, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if options.show_help {
        if write_usage(out).is_err() {
            return 1;
        }
        return 0;
    }

    if let Err(message) = init_logging(options.log_filter.as_deref(), options.log_json) {
        let _ = writeln!(err, "error: {message}");
        return 2;
    }

    let Some(input) = options.input.as_deref() else {
        let _ = writeln!(err, "error: missing input path");
        let _ = write_usage(err);
        return 2;
    };

    let files = match collect_sql_files(input) {
        Ok(files) => files,
        Err(error) => {
            let error =
                DdlError::from(error).context(format!("failed to read {}", input.display()));
            write_error_chain(err, &error);
            return error.exit_code();
        }
    };
    if files.is_empty() {
        let _ = writeln!(err, "error: no .{SQL_EXTENSION} files under {}", input.display());
        return 1;
    }
    info!(files = files.len(), input = %input.display(), "scanning");

    let tokenizer = match Tokenizer::new() {
        Ok(tokenizer) => tokenizer,
        Err(error) => {
            write_error_chain(err, &error);
            return error.exit_code();
        }
    };

    let mut failed = 0usize;
    for path in &files {
        if let Err(error) = process_file(&tokenizer, path, &options, out) {
            write_error_chain(err, &error);
            if !options.keep_going {
                return error.exit_code();
            }
            failed += 1;
        }
    }

    if failed > 0 {
        warn!(failed, total = files.len(), "some files could not be parsed");
        return 1;
    }
    0
}

fn parse_args<I>(args: I) -> std::result::Result<CliOptions, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut iter = args.into_iter();
    let _argv0 = iter.next();

    let mut options = CliOptions::default();

    while let Some(argument) = iter.next() {
        let arg = argument.to_string_lossy();
        let arg_str = arg.as_ref();

        match arg_str {
            "-h" | "--help" => options.show_help = true,
            "--pretty" => options.pretty = true,
            "--tokens" => options.tokens = true,
            "--keep-going" => options.keep_going = true,
            "--log-json" => options.log_json = true,
            "--output-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| String::from("missing value for `--output-dir`"))?;
                options.output_dir = Some(PathBuf::from(value));
            }
            "--log" => {
                let value = iter
                    .next()
                    .ok_or_else(|| String::from("missing value for `--log`"))?;
                options.log_filter = Some(value.to_string_lossy().into_owned());
            }
            _ => {
                if let Some(value) = arg_str.strip_prefix("--output-dir=") {
                    options.output_dir = Some(PathBuf::from(value));
                    continue;
                }
                if let Some(value) = arg_str.strip_prefix("--log=") {
                    options.log_filter = Some(value.to_owned());
                    continue;
                }
                if arg_str.starts_with('-') {
                    return Err(format!("unknown option `{arg_str}`"));
                }
                if options.input.is_some() {
                    return Err(String::from(
                        "too many positional arguments; expected one input path",
                    ));
                }
                options.input = Some(PathBuf::from(&argument));
            }
        }
    }

    Ok(options)
}

/// Install the stderr subscriber. A subscriber that is already installed is
/// left in place.
fn init_logging(filter: Option<&str>, json: bool) -> std::result::Result<(), String> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|error| format!("invalid log filter `{directives}`: {error}"))?,
        None => EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}

/// `path` itself when it is a `.sql` file, otherwise every `.sql` file below
/// it in sorted order.
fn collect_sql_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    if fs::metadata(path)?.is_file() {
        if !is_sql_file(path) {
            debug!(path = %path.display(), "skipping non-sql file");
            return Ok(Vec::new());
        }
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    walk(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_sql_file(&path) {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-sql file");
        }
    }
    Ok(())
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SQL_EXTENSION))
}

fn process_file<W: Write>(
    tokenizer: &Tokenizer,
    path: &Path,
    options: &CliOptions,
    out: &mut W,
) -> Result<()> {
    let context = || format!("failed to process {}", path.display());
    let src = fs::read_to_string(path).map_err(|e| DdlError::from(e).context(context()))?;
    let tokens = tokenizer
        .tokenize(&src)
        .map_err(|e| e.context("failed to tokenize source").context(context()))?;

    let rendered = if options.tokens {
        render_json(&tokens, options.pretty)?
    } else {
        let origin = DbOrigin::oracle().with_description(format!("parsed from {}", path.display()));
        let defs = parse_with_origin(&tokens, origin)
            .map_err(|e| e.context("failed to parse source").context(context()))?;
        debug!(path = %path.display(), tables = defs.tables.len(), "parsed file");
        render_json(&defs, options.pretty)?
    };

    match options.output_dir.as_deref() {
        Some(dir) => write_output_file(dir, path, &rendered).map_err(|e| e.context(context())),
        None => {
            writeln!(out, "{rendered}")?;
            Ok(())
        }
    }
}

fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| DdlError::Serialization(e.to_string()))
}

fn write_output_file(dir: &Path, source: &Path, rendered: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let target = dir.join(format!("{}.json", stem.to_string_lossy()));
    if target.exists() {
        warn!(target = %target.display(), "overwriting existing output");
    }
    fs::write(&target, format!("{rendered}\n"))?;
    info!(source = %source.display(), target = %target.display(), "wrote schema");
    Ok(())
}

/// Print an error followed by each cause in its source chain.
fn write_error_chain<E: Write>(err: &mut E, error: &DdlError) {
    let _ = writeln!(err, "error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = writeln!(err, "  caused by: {cause}");
        source = cause.source();
    }
}

fn write_usage<W>(out: &mut W) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "Usage: ddlscan <PATH> [--pretty] [--tokens] [--output-dir DIR] [--keep-going]\n\
         \x20              [--log FILTER] [--log-json]\n\
         \n\
         PATH is a .sql file or a directory searched recursively for .sql files.\n\
         \n\
         Options:\n\
         \n\
         --pretty          Pretty-print JSON output\n\
         --tokens          Print the token stream instead of the schema\n\
         --output-dir DIR  Write <name>.json per input file into DIR\n\
         --keep-going      Continue after a file fails; exit 1 at the end\n\
         --log FILTER      Log filter directives (default: ${LOG_ENV} or `info`)\n\
         --log-json        Log as JSON lines on stderr\n\
         -h, --help        Show this help\n",
    )
}
