use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_PALETTE: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

const DEFAULT_WIDTH: f32 = 200.0;
const DEFAULT_HEIGHT: f32 = 200.0;

/// Which drawing axis layers are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Layers run left to right; nodes of a layer stack top to bottom.
    #[default]
    Horizontal,
    /// Layers run top to bottom; nodes of a layer stack left to right.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayeringStrategy {
    /// Topological longest-path relaxation.
    #[default]
    LongestPath,
    /// First-discovery propagation in canonical node order. A node reached
    /// by paths of different lengths takes its layer from traversal order,
    /// and a node visited before any predecessor reached it passes layer 0
    /// on to its targets.
    Discovery,
}

/// Missing sides fall back to the defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 20.0,
            left: 20.0,
        }
    }
}

impl Margin {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    pub padding: f32,
    pub node_thickness: f32,
    pub margin: Margin,
    /// Container width, margins included.
    pub width: f32,
    /// Container height, margins included.
    pub height: f32,
    /// Allow dragging along the layer axis.
    pub allow_move_major: bool,
    /// Allow dragging along the cross axis.
    pub allow_move_minor: bool,
    pub layering: LayeringStrategy,
    pub playback: bool,
    pub palette: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            padding: 5.0,
            node_thickness: 20.0,
            margin: Margin::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            allow_move_major: true,
            allow_move_minor: true,
            layering: LayeringStrategy::LongestPath,
            playback: false,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl LayoutConfig {
    pub fn available_width(&self) -> f32 {
        let width = sanitize(self.width, DEFAULT_WIDTH);
        (width - sanitize(self.margin.left, 0.0) - sanitize(self.margin.right, 0.0)).max(0.0)
    }

    pub fn available_height(&self) -> f32 {
        let height = sanitize(self.height, DEFAULT_HEIGHT);
        (height - sanitize(self.margin.top, 0.0) - sanitize(self.margin.bottom, 0.0)).max(0.0)
    }

    /// Length of the axis layers are spread along.
    pub fn layer_axis_length(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.available_width(),
            Orientation::Vertical => self.available_height(),
        }
    }

    /// Length of the axis nodes of one layer are stacked along.
    pub fn cross_axis_length(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.available_height(),
            Orientation::Vertical => self.available_width(),
        }
    }

    pub fn padding(&self) -> f32 {
        sanitize(self.padding, 0.0)
    }

    pub fn node_thickness(&self) -> f32 {
        sanitize(self.node_thickness, 0.0)
    }

    pub fn palette_color(&self, idx: usize) -> String {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[idx % DEFAULT_PALETTE.len()].to_string();
        }
        self.palette[idx % self.palette.len()].clone()
    }
}

fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct MarginFile {
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    orientation: Option<Orientation>,
    padding: Option<f32>,
    node_thickness: Option<f32>,
    margin: Option<MarginFile>,
    width: Option<f32>,
    height: Option<f32>,
    node_move_x: Option<bool>,
    node_move_y: Option<bool>,
    layering: Option<LayeringStrategy>,
    playback: Option<bool>,
    palette: Option<Vec<String>>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = LayoutConfig::default();

    if let Some(v) = parsed.orientation {
        config.orientation = v;
    }
    if let Some(v) = parsed.padding {
        config.padding = v;
    }
    if let Some(v) = parsed.node_thickness {
        config.node_thickness = v;
    }
    if let Some(margin) = parsed.margin {
        if let Some(v) = margin.top {
            config.margin.top = v;
        }
        if let Some(v) = margin.right {
            config.margin.right = v;
        }
        if let Some(v) = margin.bottom {
            config.margin.bottom = v;
        }
        if let Some(v) = margin.left {
            config.margin.left = v;
        }
    }
    if let Some(v) = parsed.width {
        config.width = v;
    }
    if let Some(v) = parsed.height {
        config.height = v;
    }
    // nodeMoveX/Y name screen axes; map them onto layer/cross axes.
    let (major, minor) = match config.orientation {
        Orientation::Horizontal => (parsed.node_move_x, parsed.node_move_y),
        Orientation::Vertical => (parsed.node_move_y, parsed.node_move_x),
    };
    if let Some(v) = major {
        config.allow_move_major = v;
    }
    if let Some(v) = minor {
        config.allow_move_minor = v;
    }
    if let Some(v) = parsed.layering {
        config.layering = v;
    }
    if let Some(v) = parsed.playback {
        config.playback = v;
    }
    if let Some(v) = parsed.palette {
        config.palette = v;
    }

    Ok(config)
}
