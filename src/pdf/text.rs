//! PDF text strings.
//!
//! ASCII text is written as a literal string. Anything else is written as
//! UTF-16BE with a byte order mark, which every conforming reader accepts.

use lopdf::{Object, StringFormat};

const UTF16BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Encode `s` as a PDF text string object.
pub fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = Vec::with_capacity(2 + s.len() * 2);
    bytes.extend_from_slice(&UTF16BE_BOM);
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Decode a PDF string object. UTF-16BE is recognised by its byte order
/// mark; other strings are read as UTF-8, which covers the ASCII subset of
/// PDFDocEncoding.
pub fn decode_text(obj: &Object) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };
    match bytes.strip_prefix(&UTF16BE_BOM) {
        Some(rest) => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => String::from_utf8(bytes.clone()).ok(),
    }
}
