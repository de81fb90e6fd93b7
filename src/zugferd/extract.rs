use lopdf::{Dictionary, Document, Object, ObjectId};

use super::payload::md5_hex;
use crate::core::FacturXError;
use crate::pdf::decode_text;

/// Guards against cyclic `/Kids` in name trees.
const MAX_NAME_TREE_DEPTH: usize = 32;

/// An embedded file read back from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedAttachment {
    pub filename: String,
    pub description: Option<String>,
    pub relationship: Option<String>,
    pub mime_type: Option<String>,
    /// `/Params/CheckSum` as lowercase hex.
    pub checksum: Option<String>,
    /// `/Params/Size`.
    pub size: Option<i64>,
    /// `/Params/ModDate` as stored.
    pub mod_date: Option<String>,
    /// Decoded (decompressed) file content.
    pub data: Vec<u8>,
}

impl EmbeddedAttachment {
    /// Whether the recorded checksum matches the MD5 of the decoded data.
    pub fn checksum_matches(&self) -> bool {
        self.checksum
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(&md5_hex(&self.data)))
    }

    pub fn as_str(&self) -> Result<&str, FacturXError> {
        std::str::from_utf8(&self.data)
            .map_err(|e| FacturXError::Structure(format!("attachment is not UTF-8: {e}")))
    }
}

/// File specification objects reached through each discovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discovery {
    /// Via `/Names/EmbeddedFiles`.
    pub name_tree: Option<ObjectId>,
    /// Via the catalog's `/AF` array.
    pub associated_files: Option<ObjectId>,
}

impl Discovery {
    /// Both paths lead to the same file specification.
    pub fn is_consistent(&self) -> bool {
        matches!((self.name_tree, self.associated_files), (Some(a), Some(b)) if a == b)
    }
}

/// Extract the embedded file called `filename`.
///
/// Searches the `EmbeddedFiles` name tree first, then the `/AF` array.
pub fn extract_attachment(pdf_bytes: &[u8], filename: &str) -> Result<EmbeddedAttachment, FacturXError> {
    let doc = Document::load_mem(pdf_bytes)?;
    let matches = |name: &str| name == filename;
    let filespec = find_in_name_tree(&doc, &matches)
        .or_else(|| find_in_af(&doc, &matches))
        .ok_or_else(|| FacturXError::AttachmentNotFound(filename.to_string()))?;
    read_filespec(&doc, filespec)
}

/// Extract the invoice XML, recognising the Factur-X, ZUGFeRD and XRechnung
/// file names.
pub fn extract_invoice(pdf_bytes: &[u8]) -> Result<EmbeddedAttachment, FacturXError> {
    let doc = Document::load_mem(pdf_bytes)?;
    let filespec = find_in_name_tree(&doc, &is_invoice_filename)
        .or_else(|| find_in_af(&doc, &is_invoice_filename))
        .ok_or_else(|| FacturXError::AttachmentNotFound("factur-x.xml".to_string()))?;
    read_filespec(&doc, filespec)
}

/// Report where `filename` can be found. Direct (non-indirect) file
/// specifications are reported as `None`.
pub fn discover(pdf_bytes: &[u8], filename: &str) -> Result<Discovery, FacturXError> {
    let doc = Document::load_mem(pdf_bytes)?;
    let matches = |name: &str| name == filename;
    Ok(Discovery {
        name_tree: find_in_name_tree(&doc, &matches).and_then(|o| o.as_reference().ok()),
        associated_files: find_in_af(&doc, &matches).and_then(|o| o.as_reference().ok()),
    })
}

fn find_in_name_tree<'a>(doc: &'a Document, matches: &dyn Fn(&str) -> bool) -> Option<&'a Object> {
    let catalog = doc.catalog().ok()?;
    let names = resolve_dict(doc, catalog.get(b"Names").ok()?).ok()?;
    let root = resolve_dict(doc, names.get(b"EmbeddedFiles").ok()?).ok()?;
    walk_name_tree(doc, root, matches, 0)
}

fn walk_name_tree<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    matches: &dyn Fn(&str) -> bool,
    depth: usize,
) -> Option<&'a Object> {
    if depth > MAX_NAME_TREE_DEPTH {
        return None;
    }

    // Names array: [name1, ref1, name2, ref2, ...]
    if let Ok(names) = node.get(b"Names").and_then(Object::as_array) {
        for pair in names.chunks(2) {
            if let [key, value] = pair {
                if decode_text(key).is_some_and(|k| matches(&k)) {
                    return Some(value);
                }
            }
        }
    }

    let kids = node.get(b"Kids").and_then(Object::as_array).ok()?;
    kids.iter().find_map(|kid| {
        let kid = resolve_dict(doc, kid).ok()?;
        walk_name_tree(doc, kid, matches, depth + 1)
    })
}

fn find_in_af<'a>(doc: &'a Document, matches: &dyn Fn(&str) -> bool) -> Option<&'a Object> {
    let catalog = doc.catalog().ok()?;
    let af = resolve_obj(doc, catalog.get(b"AF").ok()?).ok()?;
    af.as_array().ok()?.iter().find(|entry| {
        resolve_dict(doc, entry)
            .ok()
            .and_then(filespec_name)
            .is_some_and(|name| matches(&name))
    })
}

fn read_filespec(doc: &Document, obj: &Object) -> Result<EmbeddedAttachment, FacturXError> {
    let fs = resolve_dict(doc, obj)?;
    let ef = resolve_dict(doc, fs.get(b"EF")?)?;
    let stream_ref = ef.get(b"UF").or_else(|_| ef.get(b"F"))?;
    let stream = resolve_obj(doc, stream_ref)?.as_stream()?;

    let data = if stream.dict.has(b"Filter") {
        stream.decompressed_content()?
    } else {
        stream.content.clone()
    };

    let params = stream
        .dict
        .get(b"Params")
        .ok()
        .and_then(|p| resolve_dict(doc, p).ok());
    let param = |key: &[u8]| params.and_then(|p| p.get(key).ok());

    Ok(EmbeddedAttachment {
        filename: filespec_name(fs).unwrap_or_default(),
        description: fs.get(b"Desc").ok().and_then(decode_text),
        relationship: fs.get(b"AFRelationship").ok().and_then(name_string),
        mime_type: stream.dict.get(b"Subtype").ok().and_then(name_string),
        checksum: param(b"CheckSum").and_then(checksum_text),
        size: param(b"Size").and_then(|s| s.as_i64().ok()),
        mod_date: param(b"ModDate").and_then(decode_text),
        data,
    })
}

fn filespec_name(fs: &Dictionary) -> Option<String> {
    fs.get(b"UF")
        .or_else(|_| fs.get(b"F"))
        .ok()
        .and_then(decode_text)
}

fn name_string(obj: &Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

// The PDF reference stores CheckSum as 16 raw MD5 bytes; Factur-X producers
// commonly write the hex text instead. Accept both.
fn checksum_text(obj: &Object) -> Option<String> {
    let Object::String(bytes, _) = obj else {
        return None;
    };
    if bytes.len() == 16 && !bytes.iter().all(u8::is_ascii_hexdigit) {
        return Some(bytes.iter().map(|b| format!("{b:02x}")).collect());
    }
    String::from_utf8(bytes.clone()).ok().map(|s| s.to_ascii_lowercase())
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Dictionary, FacturXError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_dictionary(*id)?),
        Object::Dictionary(d) => Ok(d),
        _ => Err(FacturXError::Structure(
            "expected dictionary or reference".to_string(),
        )),
    }
}

fn resolve_obj<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, FacturXError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn is_invoice_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("factur-x") || lower.contains("zugferd") || lower.contains("xrechnung")
}
