use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub branch_color: String,
    pub branch_width: f32,
    pub node_color: String,
    pub node_radius: f32,
    pub leaf_text_color: String,
    pub internal_text_color: String,
    pub query_color: String,
    pub metadata_text_color: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            branch_color: "#333333".to_string(),
            branch_width: 1.2,
            node_color: "#4D4D4D".to_string(),
            node_radius: 2.5,
            leaf_text_color: "#1A1A1A".to_string(),
            internal_text_color: "#777777".to_string(),
            query_color: "#C0392B".to_string(),
            metadata_text_color: "#555555".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            background: "#FFFFFF".to_string(),
            branch_color: "#7A8AA6".to_string(),
            branch_width: 1.4,
            node_color: "#41506B".to_string(),
            node_radius: 2.5,
            leaf_text_color: "#1C2430".to_string(),
            internal_text_color: "#8D99AE".to_string(),
            query_color: "#D64550".to_string(),
            metadata_text_color: "#5B6B85".to_string(),
        }
    }
}
