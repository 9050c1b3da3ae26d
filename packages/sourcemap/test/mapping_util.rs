#![allow(dead_code)]

use sourcemap_consumer::Mapping;

const B64_DIGITS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

pub fn to_base64_vlq(value: i64) -> String {
    let mut bits: u64 = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    let mut out = String::new();
    loop {
        let mut digit = (bits & 31) as u8;
        bits >>= 5;
        if bits > 0 {
            digit |= 32;
        }
        out.push(B64_DIGITS[digit as usize] as char);
        if bits == 0 {
            break;
        }
    }
    out
}

/// A segment described with absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub column: u32,
    /// (source index, original line, original column, name index)
    pub original: Option<(u32, u32, u32, Option<u32>)>,
}

/// Encode absolute segments, one `Vec` per generated line, the way a
/// generator would.
pub fn encode_lines(lines: &[Vec<Segment>]) -> String {
    let mut source_index = 0i64;
    let mut source_line = 1i64;
    let mut source_column = 0i64;
    let mut name_index = 0i64;

    let encoded: Vec<String> = lines
        .iter()
        .map(|segments| {
            let mut column = 0i64;
            segments
                .iter()
                .map(|segment| {
                    let mut out = to_base64_vlq(segment.column as i64 - column);
                    column = segment.column as i64;
                    if let Some((src, line, col, name)) = segment.original {
                        out += &to_base64_vlq(src as i64 - source_index);
                        out += &to_base64_vlq(line as i64 - source_line);
                        out += &to_base64_vlq(col as i64 - source_column);
                        source_index = src as i64;
                        source_line = line as i64;
                        source_column = col as i64;
                        if let Some(name) = name {
                            out += &to_base64_vlq(name as i64 - name_index);
                            name_index = name as i64;
                        }
                    }
                    out
                })
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    encoded.join(";")
}

/// The mappings a parser must produce for `lines`.
pub fn expected_mappings(lines: &[Vec<Segment>]) -> Vec<Mapping> {
    let mut out = Vec::new();
    for (index, segments) in lines.iter().enumerate() {
        for segment in segments {
            let mut mapping = Mapping {
                generated_line: index as u32 + 1,
                generated_column: segment.column,
                source_index: None,
                source_line: 0,
                source_column: 0,
                name_index: None,
            };
            if let Some((src, line, col, name)) = segment.original {
                mapping.source_index = Some(src);
                mapping.source_line = line;
                mapping.source_column = col;
                mapping.name_index = name;
            }
            out.push(mapping);
        }
    }
    out
}

pub fn source_map_json(mappings: &str, sources: &[&str], names: &[&str]) -> String {
    serde_json::json!({
        "version": 3,
        "file": "out.js",
        "sources": sources,
        "names": names,
        "mappings": mappings,
    })
    .to_string()
}
