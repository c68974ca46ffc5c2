//! Configuration model.
//!
//! Every section falls back to its defaults, so a partial (or empty)
//! `config.toml` is always valid.

use serde::{Deserialize, Serialize};

/// Default canonical heading that marks a reply as a derived outline.
pub const DEFAULT_CANONICAL_HEADING: &str = "# 对话分析";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub outline: OutlineConfig,
    pub archive: ArchiveConfig,
    pub render: RenderConfig,
    pub export: ExportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Upstream inference provider settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; `/models` and `/chat/completions` are appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Whole-request timeout for outbound calls.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Replaces the built-in system instruction when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deepseek.com/v1".to_string(),
            model: "deepseek-chat".to_string(),
            temperature: 0.8,
            max_tokens: 2000,
            timeout_secs: 120,
            connect_timeout_secs: 10,
            system_prompt: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutlineConfig {
    pub canonical_heading: String,
    /// A candidate region must be longer than this to survive a blank line.
    pub min_region_lines: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            canonical_heading: DEFAULT_CANONICAL_HEADING.to_string(),
            min_region_lines: 5,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Root holding `conversations/` and `mindmaps/`. Relative paths resolve
    /// against the working directory.
    pub root: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            root: "data".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub font_size: f64,
    /// Fixed display size of the surface; when unset the drawing's own
    /// extent is used as the natural size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_height: Option<f64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            surface_width: None,
            surface_height: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub max_width: f64,
    pub max_height: f64,
    pub supersample: f64,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_width: 3840.0,
            max_height: 2160.0,
            supersample: 2.0,
            file_name: "mindmap.png".to_string(),
        }
    }
}
