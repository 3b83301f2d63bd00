//! Event registry generation
//!
//! An event-definition document lists the namespaces to import and, per module, the events
//! it publishes:
//!
//!     usings:
//!       - System
//!     events:
//!       - Battle:
//!           - name: Started
//!             desc: Raised once the first wave spawns
//!           - name: Damaged<int>
//!
//! and is rendered as a static registry with one nested container per module and one
//! emitter field per event. A generic argument list on the name (`Damaged<int>`) becomes the
//! emitter's type arguments. Modules without events are left out.

use crate::references::scalar_text;
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsOptions {
    pub namespace: String,
    pub container: String,
    pub indent: String,
}

impl Default for EventsOptions {
    fn default() -> Self {
        Self {
            namespace: "GameLogic.Event".to_string(),
            container: "GE".to_string(),
            indent: "    ".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("invalid event definition document: {0}")]
    Document(#[from] serde_yaml::Error),
    #[error("an event in module `{module}` has no name")]
    MissingName { module: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub name: String,
    /// Generic argument list including the angle brackets, or empty.
    pub type_args: String,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventModule {
    pub name: String,
    pub events: Vec<EventSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDefinitions {
    pub usings: Vec<String>,
    pub modules: Vec<EventModule>,
}

pub fn parse_definitions(text: &str) -> Result<EventDefinitions, EventsError> {
    let document: Value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(text)?
    };

    let usings = document
        .get("usings")
        .and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(scalar_text).collect())
        .unwrap_or_default();

    let mut modules = Vec::new();
    let entries = document
        .get("events")
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for entry in entries {
        let Some(mapping) = entry.as_mapping() else {
            continue;
        };
        for (name, events) in mapping {
            let Some(module) = scalar_text(name) else {
                continue;
            };
            let events = match events.as_sequence() {
                Some(items) => items
                    .iter()
                    .map(|item| parse_event(&module, item))
                    .collect::<Result<Vec<_>, _>>()?,
                None => Vec::new(),
            };
            modules.push(EventModule {
                name: module,
                events,
            });
        }
    }

    Ok(EventDefinitions { usings, modules })
}

fn parse_event(module: &str, item: &Value) -> Result<EventSpec, EventsError> {
    let raw = item
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| EventsError::MissingName {
            module: module.to_string(),
        })?;
    let (name, type_args) = match raw.find('<') {
        Some(idx) => (&raw[..idx], &raw[idx..]),
        None => (raw, ""),
    };
    let desc = item
        .get("desc")
        .and_then(Value::as_str)
        .filter(|desc| !desc.is_empty())
        .map(str::to_string);

    Ok(EventSpec {
        name: name.to_string(),
        type_args: type_args.to_string(),
        desc,
    })
}

pub fn render_registry(definitions: &EventDefinitions, options: &EventsOptions) -> Vec<String> {
    let one = options.indent.as_str();
    let two = one.repeat(2);
    let three = one.repeat(3);

    let mut lines: Vec<String> = definitions
        .usings
        .iter()
        .map(|using| format!("using {using};"))
        .collect();
    lines.push(String::new());
    lines.push(format!("namespace {}", options.namespace));
    lines.push("{".to_string());
    lines.push(format!("{one}public static class {}", options.container));
    lines.push(format!("{one}{{"));
    lines.push(format!(
        "{two}static readonly EventPublisher events = new EventPublisher();"
    ));
    lines.push(format!(
        "{two}public static void OffAll() {{ events.OffAllEvents(); }}"
    ));

    for module in definitions.modules.iter().filter(|m| !m.events.is_empty()) {
        lines.push(String::new());
        lines.push(format!("{two}public static class {}", module.name));
        lines.push(format!("{two}{{"));
        for event in &module.events {
            if let Some(desc) = &event.desc {
                lines.push(format!("{three}/// <summary>"));
                lines.push(format!("{three}/// {desc}"));
                lines.push(format!("{three}/// </summary>"));
            }
            lines.push(format!(
                "{three}public static readonly EventEmitter{args} {name} = events.Reg(new EventEmitter{args}());",
                args = event.type_args,
                name = event.name,
            ));
        }
        lines.push(format!("{two}}}"));
    }

    lines.push(format!("{one}}}"));
    lines.push("}".to_string());
    lines
}

/// Parse and render in one step.
pub fn export_events(text: &str, options: &EventsOptions) -> Result<Vec<String>, EventsError> {
    let definitions = parse_definitions(text)?;
    debug!(
        modules = definitions.modules.len(),
        "rendering event registry"
    );
    Ok(render_registry(&definitions, options))
}
