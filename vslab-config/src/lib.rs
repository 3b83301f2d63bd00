//! Shared configuration loader for the vslab toolchain.
//!
//! `defaults/vslab.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user files and `VSLAB_*`
//! environment variables on top of those defaults via [`Loader`] before
//! deserializing into [`VslabConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vslab_core::events::EventsOptions;
use vslab_core::localization::{ExportOptions, SaveOptions};
use vslab_core::references::ReferenceMap;
use vslab_core::shortcuts::ShortcutSource;

const DEFAULT_TOML: &str = include_str!("../defaults/vslab.default.toml");

/// Prefix of environment overrides; nested keys are joined with `__`.
pub const ENV_PREFIX: &str = "VSLAB";

/// Top-level configuration consumed by vslab applications.
#[derive(Debug, Clone, Deserialize)]
pub struct VslabConfig {
    pub localization: LocalizationConfig,
    pub events: EventsConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizationConfig {
    pub format_on_save: bool,
    pub export_on_save: bool,
    pub semantic_highlight: bool,
    pub path_marker: String,
    pub export: ExportConfig,
}

/// Wrapper names and output location of the constants listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub namespace: String,
    pub container: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    pub path_marker: String,
    pub namespace: String,
    pub container: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    pub sources: Vec<PathBuf>,
    pub root_variable: String,
}

impl VslabConfig {
    pub fn is_localization_file(&self, path: &Path) -> bool {
        path_contains(path, &self.localization.path_marker)
    }

    pub fn is_events_file(&self, path: &Path) -> bool {
        path_contains(path, &self.events.path_marker)
    }

    /// Where the constants listing for the localization file at `path` is written.
    pub fn export_target_for(&self, path: &Path) -> PathBuf {
        relative_to(path, &self.localization.export.target)
    }

    /// Where the registry listing for the event definitions at `path` is written.
    pub fn events_target_for(&self, path: &Path) -> PathBuf {
        relative_to(path, &self.events.target)
    }

    pub fn export_options(&self) -> ExportOptions {
        let export = &self.localization.export;
        ExportOptions::new(export.namespace.clone(), export.container.clone())
    }

    pub fn events_options(&self) -> EventsOptions {
        EventsOptions {
            namespace: self.events.namespace.clone(),
            container: self.events.container.clone(),
            ..EventsOptions::default()
        }
    }

    /// Save pipeline switches as configured.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            format: self.localization.format_on_save,
            export: self
                .localization
                .export_on_save
                .then(|| self.export_options()),
        }
    }

    /// Tool documents under `root`, each seeded with the root itself.
    pub fn shortcut_sources(&self, root: &Path) -> Vec<ShortcutSource> {
        let seed = ReferenceMap::from([(
            self.tools.root_variable.clone(),
            normalize(root),
        )]);
        self.tools
            .sources
            .iter()
            .map(|source| ShortcutSource::new(root.join(source), seed.clone()))
            .collect()
    }
}

/// Path text with `/` separators, so markers match on every platform.
fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn path_contains(path: &Path, marker: &str) -> bool {
    !marker.is_empty() && normalize(path).contains(marker)
}

fn relative_to(file: &Path, target: &Path) -> PathBuf {
    file.parent()
        .map(|dir| dir.join(target))
        .unwrap_or_else(|| target.to_path_buf())
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `VSLAB_*` environment variables, e.g. `VSLAB_EVENTS__CONTAINER=Events`.
    pub fn with_env(mut self) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<VslabConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<VslabConfig, ConfigError> {
    Loader::new().build()
}
