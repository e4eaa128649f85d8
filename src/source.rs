//! Reading and decoding XML input.

use crate::error::{Error, Result};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read an XML file and decode it to a string.
///
/// The file handle is dropped before decoding starts, so it is closed on
/// every exit path.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        data
    };
    debug!("read {} bytes from {}", data.len(), path.display());
    decode_xml_bytes(&data)
}

/// Decode XML bytes, honouring a byte order mark or the encoding named in
/// the XML declaration.
///
/// Supported: UTF-8 (with or without BOM), UTF-16 LE/BE, ISO-8859-1 and
/// US-ASCII. Anything that is not valid in its detected encoding is an
/// [`Error::Encoding`].
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Encoding(format!("invalid UTF-8: {}", e)));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(rewrite_declared_encoding(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(rewrite_declared_encoding(&content));
    }

    // UTF-16 without BOM: `<?` encodes with a null byte next to each ASCII char
    if bytes.len() >= 4 && bytes[0] == b'<' && bytes[1] == 0 && bytes[3] == 0 {
        let content = decode_utf16(bytes, u16::from_le_bytes)?;
        return Ok(rewrite_declared_encoding(&content));
    }
    if bytes.len() >= 4 && bytes[0] == 0 && bytes[1] == b'<' && bytes[2] == 0 {
        let content = decode_utf16(bytes, u16::from_be_bytes)?;
        return Ok(rewrite_declared_encoding(&content));
    }

    match declared_encoding(bytes).as_deref() {
        Some("iso-8859-1") | Some("latin1") | Some("latin-1") => {
            // Every byte maps to the code point of the same value.
            let content: String = bytes.iter().map(|&b| b as char).collect();
            Ok(rewrite_declared_encoding(&content))
        }
        Some("us-ascii") | Some("ascii") => {
            if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(Error::Encoding(format!(
                    "non-ASCII byte 0x{:02X} at offset {} in US-ASCII document",
                    bytes[pos], pos
                )));
            }
            let content = String::from_utf8_lossy(bytes).into_owned();
            Ok(rewrite_declared_encoding(&content))
        }
        _ => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Encoding(format!("invalid UTF-8: {}", e))),
    }
}

/// Decode UTF-16 code units built by `to_unit` from byte pairs.
fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Encoding("odd number of bytes in UTF-16 input".to_string()));
    }

    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(format!("invalid UTF-16: {}", e)))
}

/// Lower-cased encoding name from the XML declaration, if any.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let decl = String::from_utf8_lossy(&bytes[..end]);
    let start = decl.find("encoding")? + "encoding".len();
    let rest = decl[start..].trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    let close = value.find(quote)?;
    Some(value[..close].trim().to_ascii_lowercase())
}

/// Replace the encoding named in the XML declaration with UTF-8.
///
/// Once decoded into a Rust string the content is UTF-8; a stale
/// declaration would otherwise make the parser reinterpret it.
fn rewrite_declared_encoding(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    let Some(end) = content.find("?>") else {
        return content.to_string();
    };
    let decl = &content[..end];
    let Some(pos) = decl.find("encoding") else {
        return content.to_string();
    };

    let after = &decl[pos + "encoding".len()..];
    let Some(eq) = after.find('=') else {
        return content.to_string();
    };
    let value_part = &after[eq + 1..];
    let trimmed = value_part.trim_start();
    let Some(quote) = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return content.to_string();
    };
    let Some(close) = trimmed[1..].find(quote) else {
        return content.to_string();
    };

    let value_start = pos + "encoding".len() + eq + 1 + (value_part.len() - trimmed.len());
    let value_end = value_start + close + 2;
    format!(
        "{}encoding=\"UTF-8\"{}",
        &content[..pos],
        &content[value_end..]
    )
}
