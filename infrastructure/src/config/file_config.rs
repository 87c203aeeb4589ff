//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file
//! and are deserialized directly.

use council_domain::EvalContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round journal settings
    pub journal: FileJournalConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Baseline context values merged under CLI overrides
    pub context: BTreeMap<String, f64>,
}

impl FileConfig {
    /// Baseline evaluation context from the `[context]` table
    pub fn baseline_context(&self) -> EvalContext {
        let mut ctx = EvalContext::new();
        for (key, value) in &self.context {
            ctx.set(key.clone(), *value);
        }
        ctx
    }
}

/// `[journal]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// Whether completed rounds are appended to the journal file
    pub enabled: bool,
    /// Journal file path
    pub path: PathBuf,
}

impl Default for FileJournalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("council-journal.jsonl"),
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default output format: "full", "summary", or "json"
    pub format: String,
    /// Whether to colorize console output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: "summary".to_string(),
            color: true,
        }
    }
}
