//! Reader for Android's compiled binary XML.
//!
//! Only what the catalog needs is decoded: the string pool and the
//! attributes of start-element chunks. Everything else is skipped by size.

use std::io;

const RES_STRING_POOL_TYPE: u16 = 0x0001;
const RES_XML_TYPE: u16 = 0x0003;
const RES_XML_START_ELEMENT_TYPE: u16 = 0x0102;

const UTF8_FLAG: u32 = 1 << 8;
const NO_INDEX: u32 = 0xFFFF_FFFF;

const TYPE_REFERENCE: u8 = 0x01;
const TYPE_STRING: u8 = 0x03;

/// Fields pulled out of `AndroidManifest.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// `<manifest package="...">`
    pub package: Option<String>,
    /// `<application android:label="...">` when it is a literal string.
    pub label: Option<String>,
    /// Resource id of the label when it points into `resources.arsc`.
    pub label_ref: Option<u32>,
}

/// Attribute value as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Reference(u32),
    Other(u32),
}

#[derive(Debug, Clone, Copy)]
struct ChunkHeader {
    kind: u16,
    header_size: u16,
    size: u32,
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn u8_at(data: &[u8], offset: usize) -> io::Result<u8> {
    data.get(offset)
        .copied()
        .ok_or_else(|| invalid(format!("truncated at byte {offset}")))
}

fn u16_at(data: &[u8], offset: usize) -> io::Result<u16> {
    match data.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(invalid(format!("truncated at byte {offset}"))),
    }
}

fn u32_at(data: &[u8], offset: usize) -> io::Result<u32> {
    match data.get(offset..offset + 4) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(invalid(format!("truncated at byte {offset}"))),
    }
}

fn chunk_at(data: &[u8], offset: usize) -> io::Result<ChunkHeader> {
    let header = ChunkHeader {
        kind: u16_at(data, offset)?,
        header_size: u16_at(data, offset + 2)?,
        size: u32_at(data, offset + 4)?,
    };
    if header.size < 8 || (header.header_size as u32) > header.size {
        return Err(invalid(format!("bad chunk size at byte {offset}")));
    }
    Ok(header)
}

/// Decode the manifest fields the catalog displays.
pub fn parse_manifest(data: &[u8]) -> io::Result<Manifest> {
    let root = chunk_at(data, 0)?;
    if root.kind != RES_XML_TYPE {
        return Err(invalid(format!("not a binary XML document (type {:#06x})", root.kind)));
    }

    let end = (root.size as usize).min(data.len());
    let mut offset = root.header_size as usize;
    let mut strings: Vec<String> = Vec::new();
    let mut manifest = Manifest::default();

    while offset + 8 <= end {
        let chunk = chunk_at(data, offset)?;
        match chunk.kind {
            RES_STRING_POOL_TYPE => strings = read_string_pool(data, offset, chunk)?,
            RES_XML_START_ELEMENT_TYPE => {
                let (name, attributes) = read_element(data, offset, chunk, &strings)?;
                match name.as_str() {
                    "manifest" => {
                        if let Some(Value::String(package)) = find(&attributes, "package") {
                            manifest.package = Some(package.clone());
                        }
                    }
                    "application" => match find(&attributes, "label") {
                        Some(Value::String(label)) => manifest.label = Some(label.clone()),
                        Some(Value::Reference(id)) => manifest.label_ref = Some(*id),
                        _ => {}
                    },
                    _ => {}
                }
            }
            _ => {}
        }
        offset += chunk.size as usize;
    }

    Ok(manifest)
}

fn find<'a>(attributes: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    attributes.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

fn read_string_pool(data: &[u8], start: usize, chunk: ChunkHeader) -> io::Result<Vec<String>> {
    let count = u32_at(data, start + 8)? as usize;
    let flags = u32_at(data, start + 16)?;
    let strings_start = u32_at(data, start + 20)? as usize;
    let offsets_at = start + chunk.header_size as usize;
    let utf8 = flags & UTF8_FLAG != 0;

    if count > data.len() / 4 {
        return Err(invalid("string pool count exceeds document size"));
    }

    let mut strings = Vec::with_capacity(count);
    for i in 0..count {
        let rel = u32_at(data, offsets_at + i * 4)? as usize;
        let at = start + strings_start + rel;
        let s = if utf8 {
            read_utf8(data, at)?
        } else {
            read_utf16(data, at)?
        };
        strings.push(s);
    }
    Ok(strings)
}

fn read_utf8(data: &[u8], at: usize) -> io::Result<String> {
    // Character count, then byte count; each is one or two bytes.
    let mut pos = at;
    let first = u8_at(data, pos)?;
    pos += if first & 0x80 != 0 { 2 } else { 1 };

    let b = u8_at(data, pos)?;
    let len = if b & 0x80 != 0 {
        let lo = u8_at(data, pos + 1)?;
        pos += 2;
        (((b & 0x7f) as usize) << 8) | lo as usize
    } else {
        pos += 1;
        b as usize
    };

    let bytes = data
        .get(pos..pos + len)
        .ok_or_else(|| invalid("truncated UTF-8 string"))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn read_utf16(data: &[u8], at: usize) -> io::Result<String> {
    let mut pos = at;
    let first = u16_at(data, pos)?;
    let len = if first & 0x8000 != 0 {
        let lo = u16_at(data, pos + 2)?;
        pos += 4;
        (((first & 0x7fff) as usize) << 16) | lo as usize
    } else {
        pos += 2;
        first as usize
    };

    let units = (0..len)
        .map(|i| u16_at(data, pos + i * 2))
        .collect::<io::Result<Vec<u16>>>()?;
    Ok(String::from_utf16_lossy(&units))
}

fn string_at(strings: &[String], index: u32) -> Option<&str> {
    if index == NO_INDEX {
        return None;
    }
    strings.get(index as usize).map(String::as_str)
}

fn read_element(
    data: &[u8],
    start: usize,
    chunk: ChunkHeader,
    strings: &[String],
) -> io::Result<(String, Vec<(String, Value)>)> {
    let ext = start + chunk.header_size as usize;
    let name = string_at(strings, u32_at(data, ext + 4)?)
        .unwrap_or_default()
        .to_string();
    let attribute_start = u16_at(data, ext + 8)? as usize;
    let attribute_size = u16_at(data, ext + 10)? as usize;
    let attribute_count = u16_at(data, ext + 12)? as usize;

    let mut attributes = Vec::with_capacity(attribute_count);
    for i in 0..attribute_count {
        let at = ext + attribute_start + i * attribute_size;
        let Some(attr_name) = string_at(strings, u32_at(data, at + 4)?) else {
            continue;
        };
        let raw = u32_at(data, at + 8)?;
        let data_type = u8_at(data, at + 15)?;
        let value = u32_at(data, at + 16)?;

        let value = match string_at(strings, raw) {
            Some(s) => Value::String(s.to_string()),
            None => match data_type {
                TYPE_STRING => string_at(strings, value)
                    .map(|s| Value::String(s.to_string()))
                    .unwrap_or(Value::Other(value)),
                TYPE_REFERENCE => Value::Reference(value),
                _ => Value::Other(value),
            },
        };
        attributes.push((attr_name.to_string(), value));
    }

    Ok((name, attributes))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Builders for small binary XML documents.

    use super::*;

    fn string_pool(strings: &[&str]) -> Vec<u8> {
        let header_size: u16 = 28;
        let mut offsets = Vec::new();
        let mut body = Vec::new();
        for s in strings {
            offsets.push(body.len() as u32);
            let units: Vec<u16> = s.encode_utf16().collect();
            body.extend_from_slice(&(units.len() as u16).to_le_bytes());
            for u in units {
                body.extend_from_slice(&u.to_le_bytes());
            }
            body.extend_from_slice(&[0, 0]);
        }
        while body.len() % 4 != 0 {
            body.push(0);
        }

        let strings_start = header_size as u32 + 4 * strings.len() as u32;
        let size = strings_start + body.len() as u32;

        let mut out = Vec::new();
        out.extend_from_slice(&RES_STRING_POOL_TYPE.to_le_bytes());
        out.extend_from_slice(&header_size.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&(strings.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&strings_start.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        for o in offsets {
            out.extend_from_slice(&o.to_le_bytes());
        }
        out.extend_from_slice(&body);
        out
    }

    /// `attrs` are `(name index, data type, data)`.
    fn start_element(name: u32, attrs: &[(u32, u8, u32)]) -> Vec<u8> {
        let size = 16 + 20 + 20 * attrs.len() as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&RES_XML_START_ELEMENT_TYPE.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&NO_INDEX.to_le_bytes());
        out.extend_from_slice(&NO_INDEX.to_le_bytes());
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&(attrs.len() as u16).to_le_bytes());
        out.extend_from_slice(&[0u8; 6]);
        for &(attr_name, data_type, data) in attrs {
            let raw = if data_type == TYPE_STRING { data } else { NO_INDEX };
            out.extend_from_slice(&NO_INDEX.to_le_bytes());
            out.extend_from_slice(&attr_name.to_le_bytes());
            out.extend_from_slice(&raw.to_le_bytes());
            out.extend_from_slice(&8u16.to_le_bytes());
            out.push(0);
            out.push(data_type);
            out.extend_from_slice(&data.to_le_bytes());
        }
        out
    }

    fn document(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = Vec::new();
        out.extend_from_slice(&RES_XML_TYPE.to_le_bytes());
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&(8 + body.len() as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// A manifest with a literal application label.
    pub fn manifest(package: &str, label: &str) -> Vec<u8> {
        let pool = string_pool(&["manifest", "package", "application", "label", package, label]);
        document(&[
            pool,
            start_element(0, &[(1, TYPE_STRING, 4)]),
            start_element(2, &[(3, TYPE_STRING, 5)]),
        ])
    }

    /// A manifest whose label is a resource reference.
    pub fn manifest_with_label_ref(package: &str, id: u32) -> Vec<u8> {
        let pool = string_pool(&["manifest", "package", "application", "label", package]);
        document(&[
            pool,
            start_element(0, &[(1, TYPE_STRING, 4)]),
            start_element(2, &[(3, TYPE_REFERENCE, id)]),
        ])
    }
}
