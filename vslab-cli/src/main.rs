//! Command-line interface for vslab
//! Checks, formats and exports localization tables, and works with tool and event documents.
//!
//! Usage:
//!   vslab check `<file>`                                   - Parse and validate a table
//!   vslab format `<file>` [--write]                        - Canonical formatting
//!   vslab export `<file>` [--namespace N] [--container C]  - Constants listing
//!   vslab tokens `<file>` [--placeholders|--no-placeholders]
//!   vslab resolve `<file>` [--seed NAME=VALUE]... [--map]
//!   vslab shortcuts [--root DIR] [--layered]
//!   vslab events `<file>` [--output P]
//!   vslab convert `<file>` --to json|yaml

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vslab_config::{Loader, VslabConfig};

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Path to the input file")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(1)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Write the listing here instead of stdout")
        .value_parser(clap::value_parser!(PathBuf))
}

fn cli() -> Command {
    Command::new("vslab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tools for vslab localization tables, tool documents and event definitions")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .subcommand(
            Command::new("check")
                .about("Parse and validate a localization table")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("format")
                .about("Print the canonical form of a localization table")
                .arg(file_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Rewrite the file in place")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Generate the constants listing for a localization table")
                .arg(file_arg())
                .arg(
                    Arg::new("namespace")
                        .long("namespace")
                        .help("Namespace of the generated listing"),
                )
                .arg(
                    Arg::new("container")
                        .long("container")
                        .help("Name of the generated static container"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the semantic tokens of a localization table as JSON")
                .arg(file_arg())
                .arg(
                    Arg::new("placeholders")
                        .long("placeholders")
                        .help("Highlight escapes and placeholders inside values")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("no-placeholders"),
                )
                .arg(
                    Arg::new("no-placeholders")
                        .long("no-placeholders")
                        .help("Treat every value as plain text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Expand ${name} references in a tool document")
                .arg(file_arg())
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .short('s')
                        .help("Initial reference, as NAME=VALUE")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("map")
                        .long("map")
                        .help("Print the resolved reference map as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("shortcuts")
                .about("Aggregate shortcuts from the configured tool documents")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .short('r')
                        .help("Workspace root (default: current directory)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("layered")
                        .long("layered")
                        .help("Let each document use the references of the one before it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("events")
                .about("Generate the event registry from an event definition document")
                .arg(file_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a document between YAML and JSON")
                .arg(file_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Target format")
                        .required(true)
                        .value_parser(commands::CONVERT_TARGETS.to_vec()),
                ),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(output) => print!("{}", output),
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<String, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command given".to_string())?;
    let file = || {
        sub.get_one::<PathBuf>("file")
            .map(PathBuf::as_path)
            .ok_or_else(|| "Missing input file".to_string())
    };
    let output = || sub.get_one::<PathBuf>("output").map(PathBuf::as_path);

    match name {
        "check" => commands::check(file()?),
        "format" => commands::format(file()?, sub.get_flag("write")),
        "export" => {
            let config = load_config(sub, export_overrides(sub))?;
            commands::export(file()?, &config, output())
        }
        "tokens" => {
            let mut overrides = Vec::new();
            if sub.get_flag("placeholders") {
                overrides.push(("localization.semantic_highlight", "true".to_string()));
            }
            if sub.get_flag("no-placeholders") {
                overrides.push(("localization.semantic_highlight", "false".to_string()));
            }
            let config = load_config(sub, overrides)?;
            commands::tokens(file()?, &config)
        }
        "resolve" => {
            let seeds = sub.get_many::<String>("seed").into_iter().flatten();
            let seed = commands::parse_seeds(seeds)?;
            commands::resolve_references(file()?, &seed, sub.get_flag("map"))
        }
        "shortcuts" => {
            let config = load_config(sub, Vec::new())?;
            let root = match sub.get_one::<PathBuf>("root") {
                Some(root) => root.clone(),
                None => std::env::current_dir()
                    .map_err(|e| format!("Failed to read current directory: {}", e))?,
            };
            commands::shortcuts(&root, &config, sub.get_flag("layered"))
        }
        "events" => {
            let config = load_config(sub, Vec::new())?;
            commands::events(file()?, &config, output())
        }
        "convert" => {
            let to = sub
                .get_one::<String>("to")
                .ok_or_else(|| "Missing --to".to_string())?;
            commands::convert(file()?, to)
        }
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn export_overrides(sub: &ArgMatches) -> Vec<(&'static str, String)> {
    [
        ("namespace", "localization.export.namespace"),
        ("container", "localization.export.container"),
    ]
    .into_iter()
    .filter_map(|(arg, key)| sub.get_one::<String>(arg).map(|value| (key, value.clone())))
    .collect()
}

/// Defaults, then `VSLAB_*` variables, then `--config`, then command-line flags.
fn load_config(
    matches: &ArgMatches,
    overrides: Vec<(&'static str, String)>,
) -> Result<VslabConfig, String> {
    let mut loader = Loader::new().with_env();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    for (key, value) in overrides {
        loader = loader
            .set_override(key, value)
            .map_err(|e| format!("Invalid setting {}: {}", key, e))?;
    }
    loader
        .build()
        .map_err(|e| format!("Configuration error: {}", e))
}
