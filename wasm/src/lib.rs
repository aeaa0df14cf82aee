use sankey_layout::{LayeringStrategy, LayoutConfig, Margin, Orientation, Sankey, parse_data};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SankeyOptions {
    orient: Option<Orientation>,
    padding: Option<f32>,
    #[serde(alias = "nodeWidth")]
    node_size: Option<f32>,
    margin: Option<Margin>,
    width: Option<f32>,
    height: Option<f32>,
    node_move_x: Option<bool>,
    node_move_y: Option<bool>,
    layering: Option<LayeringStrategy>,
    playback: Option<bool>,
}

fn build_config(options: SankeyOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(orient) = options.orient {
        config.orientation = orient;
    }
    if let Some(padding) = options.padding {
        config.padding = padding;
    }
    if let Some(node_size) = options.node_size {
        config.node_thickness = node_size;
    }
    if let Some(margin) = options.margin {
        config.margin = margin;
    }
    if let Some(width) = options.width {
        config.width = width;
    }
    if let Some(height) = options.height {
        config.height = height;
    }
    let (major, minor) = match config.orientation {
        Orientation::Horizontal => (options.node_move_x, options.node_move_y),
        Orientation::Vertical => (options.node_move_y, options.node_move_x),
    };
    if let Some(major) = major {
        config.allow_move_major = major;
    }
    if let Some(minor) = minor {
        config.allow_move_minor = minor;
    }
    if let Some(layering) = options.layering {
        config.layering = layering;
    }
    if let Some(playback) = options.playback {
        config.playback = playback;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<SankeyOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(SankeyOptions::default()),
    }
}

fn to_js(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// A laid-out diagram kept alive on the JS side so drags and clicks can be
/// fed back into it.
#[wasm_bindgen]
pub struct SankeyHandle {
    inner: Sankey,
}

#[wasm_bindgen]
impl SankeyHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(data: &str, options_json: Option<String>) -> Result<SankeyHandle, JsValue> {
        let config = build_config(parse_options(options_json).map_err(to_js)?);
        let data = parse_data(data).map_err(to_js)?;
        let inner = Sankey::new(&data, config).map_err(to_js)?;
        Ok(SankeyHandle { inner })
    }

    #[wasm_bindgen(js_name = layoutJson)]
    pub fn layout_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.layout()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = moveNode)]
    pub fn move_node(&mut self, node: usize, x: f32, y: f32) -> Result<(), JsValue> {
        self.inner.move_node(node, x, y).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectNode)]
    pub fn select_node(&mut self, node: usize) -> Result<(), JsValue> {
        self.inner.select_node(node).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = selectLink)]
    pub fn select_link(&mut self, link: usize) -> Result<(), JsValue> {
        self.inner.select_link(link).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    #[wasm_bindgen(js_name = advancePlayback)]
    pub fn advance_playback(&mut self, node: usize) -> Result<String, JsValue> {
        let step = self.inner.advance_playback(node).map_err(to_js)?;
        serde_json::to_string(&step).map_err(to_js)
    }

    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.drain_events()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = toString)]
    pub fn to_text(&self) -> String {
        self.inner.to_string()
    }
}

/// One-shot layout: data in, layout JSON out.
#[wasm_bindgen]
pub fn layout_sankey_json(data: &str, options_json: Option<String>) -> Result<String, JsValue> {
    SankeyHandle::new(data, options_json)?.layout_json()
}
