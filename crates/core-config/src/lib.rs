//! Configuration loading and the editor option store.
//!
//! `oxidized.toml` (or an override path supplied by the binary) is parsed into
//! `ConfigFile`; only the `[editor]` table is read. Unknown fields are ignored
//! and a missing or unparsable file falls back to defaults, so a broken config
//! never prevents editing.
//!
//! ```toml
//! [editor]
//! shiftwidth = 4
//! tabstop = 8
//! expandtab = true
//! clipboard = "unnamed"   # or "" to keep registers local
//! wrapscan = true
//! ignorecase = false
//! keep_visual_on_indent = false
//! ```
//!
//! Besides the file view, `Config` is a small key→value store
//! (`get_option`/`set_option`, Vim option names and short aliases) and
//! produces the immutable `EditorOptions` snapshot handed to the mode
//! orchestrator.

use anyhow::Result;
use serde::Deserialize;
use std::{fmt, fs, path::PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EditorSection {
    #[serde(default = "EditorSection::default_shiftwidth")]
    pub shiftwidth: usize,
    #[serde(default = "EditorSection::default_tabstop")]
    pub tabstop: usize,
    #[serde(default = "EditorSection::default_expandtab")]
    pub expandtab: bool,
    #[serde(default = "EditorSection::default_clipboard")]
    pub clipboard: String,
    #[serde(default = "EditorSection::default_wrapscan")]
    pub wrapscan: bool,
    #[serde(default)]
    pub ignorecase: bool,
    #[serde(default)]
    pub keep_visual_on_indent: bool,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            shiftwidth: Self::default_shiftwidth(),
            tabstop: Self::default_tabstop(),
            expandtab: Self::default_expandtab(),
            clipboard: Self::default_clipboard(),
            wrapscan: Self::default_wrapscan(),
            ignorecase: false,
            keep_visual_on_indent: false,
        }
    }
}

impl EditorSection {
    const fn default_shiftwidth() -> usize {
        4
    }
    const fn default_tabstop() -> usize {
        8
    }
    const fn default_expandtab() -> bool {
        true
    }
    fn default_clipboard() -> String {
        "unnamed".to_string()
    }
    const fn default_wrapscan() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorSection,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Immutable option snapshot consumed by handlers and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub shiftwidth: usize,
    pub tabstop: usize,
    pub expandtab: bool,
    /// Mirror the unnamed register to the system clipboard.
    pub clipboard_unnamed: bool,
    pub wrapscan: bool,
    pub ignorecase: bool,
    pub keep_visual_on_indent: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Config::default().options()
    }
}

impl EditorOptions {
    /// Leading whitespace spanning `width` columns: spaces under `expandtab`,
    /// otherwise as many tabs as fit plus spaces for the remainder.
    pub fn indent_for(&self, width: usize) -> String {
        if self.expandtab {
            " ".repeat(width)
        } else {
            let ts = self.tabstop.max(1);
            let mut out = "\t".repeat(width / ts);
            out.push_str(&" ".repeat(width % ts));
            out
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Number(usize),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("E518: Unknown option: {0}")]
    UnknownOption(String),
    #[error("E474: Invalid argument: {option}={value}")]
    InvalidValue { option: &'static str, value: String },
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("oxidized.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("oxidized").join("oxidized.toml");
    }
    PathBuf::from("oxidized.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_missing_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_defaults");
            Ok(Config::default())
        }
    }
}

fn canonical_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "shiftwidth" | "sw" => "shiftwidth",
        "tabstop" | "ts" => "tabstop",
        "expandtab" | "et" => "expandtab",
        "clipboard" | "cb" => "clipboard",
        "wrapscan" | "ws" => "wrapscan",
        "ignorecase" | "ic" => "ignorecase",
        "keep_visual_on_indent" => "keep_visual_on_indent",
        _ => return None,
    })
}

fn parse_bool(option: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option,
            value: value.to_string(),
        }),
    }
}

fn parse_width(option: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            option,
            value: value.to_string(),
        }),
    }
}

impl Config {
    pub fn options(&self) -> EditorOptions {
        let e = &self.file.editor;
        EditorOptions {
            shiftwidth: e.shiftwidth.max(1),
            tabstop: e.tabstop.max(1),
            expandtab: e.expandtab,
            clipboard_unnamed: e.clipboard.split(',').any(|v| v.starts_with("unnamed")),
            wrapscan: e.wrapscan,
            ignorecase: e.ignorecase,
            keep_visual_on_indent: e.keep_visual_on_indent,
        }
    }

    pub fn get_option(&self, name: &str) -> Result<OptionValue, ConfigError> {
        let canonical =
            canonical_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        let e = &self.file.editor;
        Ok(match canonical {
            "shiftwidth" => OptionValue::Number(e.shiftwidth),
            "tabstop" => OptionValue::Number(e.tabstop),
            "expandtab" => OptionValue::Bool(e.expandtab),
            "clipboard" => OptionValue::Text(e.clipboard.clone()),
            "wrapscan" => OptionValue::Bool(e.wrapscan),
            "ignorecase" => OptionValue::Bool(e.ignorecase),
            _ => OptionValue::Bool(e.keep_visual_on_indent),
        })
    }

    /// Set an option from its textual value. Nothing changes on error.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let canonical =
            canonical_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        let e = &mut self.file.editor;
        match canonical {
            "shiftwidth" => e.shiftwidth = parse_width(canonical, value)?,
            "tabstop" => e.tabstop = parse_width(canonical, value)?,
            "expandtab" => e.expandtab = parse_bool(canonical, value)?,
            "clipboard" => match value {
                "" | "unnamed" | "unnamedplus" => e.clipboard = value.to_string(),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        option: canonical,
                        value: value.to_string(),
                    });
                }
            },
            "wrapscan" => e.wrapscan = parse_bool(canonical, value)?,
            "ignorecase" => e.ignorecase = parse_bool(canonical, value)?,
            _ => e.keep_visual_on_indent = parse_bool(canonical, value)?,
        }
        debug!(target: "config", option = canonical, value, "option_set");
        Ok(())
    }
}
