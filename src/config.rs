use crate::layout::LayoutMode;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    /// Pull every leaf to the far depth edge so labels line up in a
    /// column; internal nodes then interpolate by topological depth.
    pub align_leaves: bool,
    /// Minimum lateral separation between adjacent leaves. Feeds the
    /// recommended canvas extent; the engine never compresses below it
    /// silently.
    pub leaf_spacing: f32,
    /// When set, siblings are ordered by descending child count so bushier
    /// clades come first. Off by default: parsed order is kept.
    pub sort_siblings: bool,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Dendrogram,
            align_leaves: false,
            leaf_spacing: 18.0,
            sort_siblings: false,
            margin_x: 24.0,
            margin_y: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Gap between a leaf tip and the start of its label.
    pub label_gap: f32,
    /// Draw similarity / correlation values beside aligned leaves.
    pub metadata_columns: bool,
    /// Leaf highlighted as the query element, matched case-insensitively.
    pub query_name: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
            label_gap: 6.0,
            metadata_columns: false,
            query_name: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

/// Partial config file: every field optional, merged over defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutFile>,
    render: Option<RenderFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    branch_color: Option<String>,
    branch_width: Option<f32>,
    node_color: Option<String>,
    leaf_text_color: Option<String>,
    query_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LayoutFile {
    mode: Option<LayoutMode>,
    align_leaves: Option<bool>,
    leaf_spacing: Option<f32>,
    sort_siblings: Option<bool>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RenderFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    label_gap: Option<f32>,
    metadata_columns: Option<bool>,
    query_name: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    // Strict JSON first; fall back to json5 for relaxed syntax.
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.branch_color {
            config.theme.branch_color = v;
        }
        if let Some(v) = vars.branch_width {
            config.theme.branch_width = v;
        }
        if let Some(v) = vars.node_color {
            config.theme.node_color = v;
        }
        if let Some(v) = vars.leaf_text_color {
            config.theme.leaf_text_color = v;
        }
        if let Some(v) = vars.query_color {
            config.theme.query_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.mode {
            config.layout.mode = v;
        }
        if let Some(v) = layout.align_leaves {
            config.layout.align_leaves = v;
        }
        if let Some(v) = layout.leaf_spacing {
            config.layout.leaf_spacing = v;
        }
        if let Some(v) = layout.sort_siblings {
            config.layout.sort_siblings = v;
        }
        if let Some(v) = layout.margin_x {
            config.layout.margin_x = v;
        }
        if let Some(v) = layout.margin_y {
            config.layout.margin_y = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.label_gap {
            config.render.label_gap = v;
        }
        if let Some(v) = render.metadata_columns {
            config.render.metadata_columns = v;
        }
        if render.query_name.is_some() {
            config.render.query_name = render.query_name;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.mode, LayoutMode::Dendrogram);
        assert!(!config.layout.align_leaves);
    }

    #[test]
    fn merges_partial_json5_file() {
        let dir = std::env::temp_dir().join("phylo-render-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json5");
        std::fs::write(
            &path,
            "{ theme: 'modern', layout: { mode: 'phylogram', alignLeaves: true } }",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout.mode, LayoutMode::Phylogram);
        assert!(config.layout.align_leaves);
        // Untouched fields keep their defaults.
        assert_eq!(config.layout.leaf_spacing, 18.0);
    }
}
