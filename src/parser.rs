use crate::ir::SankeyData;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^sankey(-beta)?\s*$").expect("valid header regex"));

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid data document: {0}")]
    Json(#[from] json5::Error),
    #[error("line {line}: {message}")]
    Line { line: usize, message: String },
}

/// Reads sankey data from either a JSON/JSON5 document (`{"nodes": [...],
/// "links": [...]}`) or the CSV text form, one `source,target,value` per line.
pub fn parse_data(input: &str) -> Result<SankeyData, ParseError> {
    if input.trim_start().starts_with('{') {
        return parse_json(input);
    }
    parse_sankey_text(input)
}

pub fn parse_json(input: &str) -> Result<SankeyData, ParseError> {
    Ok(json5::from_str(input)?)
}

/// Nodes are created in first-seen order. Blank lines, `%%` comments and a
/// leading `sankey` / `sankey-beta` header are skipped.
pub fn parse_sankey_text(input: &str) -> Result<SankeyData, ParseError> {
    let mut data = SankeyData::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line_idx, raw_line) in input.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("%%") || HEADER_RE.is_match(line) {
            continue;
        }
        let fields = split_csv_line(line).map_err(|message| ParseError::Line {
            line: line_no,
            message,
        })?;
        if fields.len() != 3 {
            return Err(ParseError::Line {
                line: line_no,
                message: format!("expected 3 fields (source,target,value), found {}", fields.len()),
            });
        }
        let source = fields[0].trim();
        let target = fields[1].trim();
        if source.is_empty() || target.is_empty() {
            return Err(ParseError::Line {
                line: line_no,
                message: "source and target must not be empty".to_string(),
            });
        }
        let value: f32 = fields[2].trim().parse().map_err(|_| ParseError::Line {
            line: line_no,
            message: format!("invalid value '{}'", fields[2].trim()),
        })?;

        let source = node_index(&mut data, &mut index, source);
        let target = node_index(&mut data, &mut index, target);
        data.links
            .push(crate::ir::LinkRecord::new(source, target, value));
    }

    Ok(data)
}

fn node_index(data: &mut SankeyData, index: &mut HashMap<String, usize>, name: &str) -> usize {
    if let Some(&idx) = index.get(name) {
        return idx;
    }
    let idx = data.ensure_node(name);
    index.insert(name.to_string(), idx);
    idx
}

/// Splits one CSV record. Quoted fields may contain commas, and `""` inside
/// quotes is a literal quote.
fn split_csv_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}
