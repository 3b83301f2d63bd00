use serde_json::Value;
use std::path::Path;
use tower_lsp::jsonrpc::{Error, Result};
use tracing::debug;
use vslab_config::VslabConfig;
use vslab_core::convert::{json_to_yaml, yaml_to_json};
use vslab_core::shortcuts::{aggregate, aggregate_layered, FsReader};

pub const COMMAND_VERSION: &str = "vslab.version";
pub const COMMAND_YAML_TO_JSON: &str = "vslab.yaml2json";
pub const COMMAND_JSON_TO_YAML: &str = "vslab.json2yaml";
pub const COMMAND_SHORTCUTS: &str = "vslab.shortcuts";

pub const COMMANDS: &[&str] = &[
    COMMAND_VERSION,
    COMMAND_YAML_TO_JSON,
    COMMAND_JSON_TO_YAML,
    COMMAND_SHORTCUTS,
];

/// Run a workspace command.
///
/// Conversions take the document text as their first argument and return the converted
/// text. `vslab.shortcuts` takes the workspace root and an optional `layered` flag and
/// returns the aggregated entries.
pub fn execute_command(
    command: &str,
    arguments: &[Value],
    config: &VslabConfig,
) -> Result<Option<Value>> {
    debug!(command, "execute command");
    match command {
        COMMAND_VERSION => Ok(Some(Value::String(env!("CARGO_PKG_VERSION").to_string()))),
        COMMAND_YAML_TO_JSON => {
            let converted = yaml_to_json(text_argument(arguments)?).map_err(invalid_params)?;
            Ok(Some(Value::String(converted)))
        }
        COMMAND_JSON_TO_YAML => {
            let converted = json_to_yaml(text_argument(arguments)?).map_err(invalid_params)?;
            Ok(Some(Value::String(converted)))
        }
        COMMAND_SHORTCUTS => {
            let root = Path::new(text_argument(arguments)?);
            let layered = arguments.get(1).and_then(Value::as_bool).unwrap_or(false);
            let sources = config.shortcut_sources(root);
            let entries = if layered {
                aggregate_layered(&sources, &FsReader)
            } else {
                aggregate(&sources, &FsReader)
            }
            .map_err(invalid_params)?;
            let value = serde_json::to_value(entries).map_err(|_| Error::internal_error())?;
            Ok(Some(value))
        }
        _ => Err(Error::method_not_found()),
    }
}

fn text_argument(arguments: &[Value]) -> Result<&str> {
    arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_params("expected a string argument"))
}

fn invalid_params(err: impl std::fmt::Display) -> Error {
    Error::invalid_params(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn config() -> VslabConfig {
        vslab_config::load_defaults().unwrap()
    }

    #[test]
    fn version_reports_the_crate_version() {
        let value = execute_command(COMMAND_VERSION, &[], &config()).unwrap();
        assert_eq!(value, Some(json!(env!("CARGO_PKG_VERSION"))));
    }

    #[test]
    fn converts_between_yaml_and_json() {
        let json = execute_command(COMMAND_YAML_TO_JSON, &[json!("a: 1\n")], &config())
            .unwrap()
            .unwrap();
        assert_eq!(json, json!("{\n    \"a\": 1\n}"));

        let yaml = execute_command(COMMAND_JSON_TO_YAML, &[json!("{\"a\": 1}")], &config())
            .unwrap()
            .unwrap();
        assert_eq!(yaml, json!("a: 1\n"));
    }

    #[test]
    fn conversion_errors_are_invalid_params() {
        let err = execute_command(COMMAND_JSON_TO_YAML, &[json!("{not json")], &config())
            .unwrap_err();
        assert_eq!(err.code, tower_lsp::jsonrpc::ErrorCode::InvalidParams);

        let err = execute_command(COMMAND_YAML_TO_JSON, &[], &config()).unwrap_err();
        assert_eq!(err.code, tower_lsp::jsonrpc::ErrorCode::InvalidParams);
    }

    #[test]
    fn shortcuts_read_the_configured_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("tools.yaml"),
            "shortcuts:\n  - uri: ${ROOT}/docs\n    desc: Docs\n",
        )
        .unwrap();
        let root = dir.path().to_string_lossy().replace('\\', "/");

        let value = execute_command(COMMAND_SHORTCUTS, &[json!(root)], &config())
            .unwrap()
            .unwrap();
        assert_eq!(
            value,
            json!([{ "label": "Docs", "target": format!("{root}/docs") }])
        );
    }

    #[test]
    fn unknown_commands_are_rejected() {
        assert!(execute_command("vslab.nope", &[], &config()).is_err());
    }
}
