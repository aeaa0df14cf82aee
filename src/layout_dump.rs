use crate::layout::SankeyLayout;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub orientation: String,
    pub width: f32,
    pub height: f32,
    pub node_thickness: f32,
    pub max_layer: usize,
    pub extent: [f32; 2],
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: usize,
    pub name: String,
    pub layer: usize,
    pub value: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LinkDump {
    pub id: usize,
    pub source: String,
    pub target: String,
    pub value: f32,
    pub thickness: f32,
    pub source_offset: f32,
    pub target_offset: f32,
    pub fill: String,
    pub title: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &SankeyLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id,
                name: node.name.clone(),
                layer: node.layer,
                value: node.value,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                fill: node.fill.clone(),
                title: format!("{} - {}", node.name, format_value(node.value)),
            })
            .collect();

        let links = layout
            .links
            .iter()
            .map(|link| {
                let source = node_name(layout, link.source);
                let target = node_name(layout, link.target);
                LinkDump {
                    id: link.id,
                    title: format!("{} -> {} - {}", source, target, format_value(link.value)),
                    source,
                    target,
                    value: link.value,
                    thickness: link.thickness,
                    source_offset: link.source_offset,
                    target_offset: link.target_offset,
                    fill: link.fill.clone(),
                }
            })
            .collect();

        LayoutDump {
            orientation: format!("{:?}", layout.orientation),
            width: layout.width,
            height: layout.height,
            node_thickness: layout.node_thickness,
            max_layer: layout.max_layer,
            extent: [layout.extent.0, layout.extent.1],
            nodes,
            links,
        }
    }
}

fn node_name(layout: &SankeyLayout, id: usize) -> String {
    layout
        .node(id)
        .map(|node| node.name.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

/// Plain-text listing for debugging: one `name: value (L: layer)` line per
/// node, then one `source->target` line per link.
pub fn text_dump(layout: &SankeyLayout) -> String {
    let nodes: Vec<String> = layout
        .nodes
        .iter()
        .map(|node| format!("{}: {} (L: {})", node.name, node.value, node.layer))
        .collect();
    let links: Vec<String> = layout
        .links
        .iter()
        .map(|link| {
            format!(
                "{}->{}",
                node_name(layout, link.source),
                node_name(layout, link.target)
            )
        })
        .collect();
    format!("nodes:\n{}\n\nlinks:\n{}", nodes.join("\n"), links.join("\n"))
}

/// Tooltip formatting: two decimals below 1, one below 10, otherwise whole
/// numbers with thousands separators.
pub fn format_value(value: f32) -> String {
    let decimals = if value < 1.0 {
        2
    } else if value < 10.0 {
        1
    } else {
        0
    };
    let formatted = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn write_layout_dump(path: Option<&Path>, layout: &SankeyLayout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{LinkRecord, NodeRecord, SankeyData};
    use crate::layout::compute_sankey_layout;

    #[test]
    fn formats_values_by_magnitude() {
        assert_eq!(format_value(0.456), "0.46");
        assert_eq!(format_value(3.14), "3.1");
        assert_eq!(format_value(1201.0), "1,201");
        assert_eq!(format_value(1234567.0), "1,234,567");
        assert_eq!(format_value(999.4), "999");
        assert_eq!(format_value(-0.5), "-0.50");
    }

    #[test]
    fn dump_carries_titles_and_names() {
        let data = SankeyData {
            nodes: vec![NodeRecord::new("Coal"), NodeRecord::new("Power")],
            links: vec![LinkRecord::new(0, 1, 2500.0)],
        };
        let layout = compute_sankey_layout(&data, &LayoutConfig::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.nodes[0].title, "Coal - 2,500");
        assert_eq!(dump.links[0].source, "Coal");
        assert_eq!(dump.links[0].title, "Coal -> Power - 2,500");
        assert_eq!(dump.orientation, "Horizontal");

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["links"][0]["target"], "Power");
    }
}
