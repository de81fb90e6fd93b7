use std::borrow::Cow;

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::core::{FacturXError, ZugferdProfile, ZugferdVersion};
use crate::pdf::xmp_date;

/// Values substituted into the XMP metadata template.
#[derive(Debug, Clone)]
pub struct XmpFields<'a> {
    pub filename: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub creator_tool: &'a str,
    pub producer: &'a str,
    pub version: ZugferdVersion,
    pub profile: ZugferdProfile,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl XmpFields<'_> {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "InvoiceFilename" => self.filename.to_string(),
            "DocumentTitle" => self.title.to_string(),
            "DocumentDescription" => self.description.to_string(),
            "CreatorTool" => self.creator_tool.to_string(),
            "Producer" => self.producer.to_string(),
            "CreationDate" => xmp_date(&self.created),
            "ModificationDate" => xmp_date(&self.modified),
            "ConformanceLevel" => self.profile.conformance_level().to_string(),
            "SchemaNamespace" => self.version.xmp_namespace().to_string(),
            "SchemaVersion" => self.version.xmp_version().to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Fill every `{{Placeholder}}` of `template` with its XML-escaped value.
///
/// Substitution is a single pass over the template, so values are never
/// re-scanned. Characters XML 1.0 does not allow are dropped from values.
/// Unknown or unterminated placeholders are errors.
pub fn render(template: &[u8], fields: &XmpFields<'_>) -> Result<String, FacturXError> {
    let template = std::str::from_utf8(template)
        .map_err(|e| FacturXError::Template(format!("template is not UTF-8: {e}")))?;

    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            FacturXError::Template(format!(
                "unterminated placeholder at byte {}",
                template.len() - rest.len() + start
            ))
        })?;
        let name = &after[..end];
        let value = fields
            .lookup(name)
            .ok_or_else(|| FacturXError::Template(format!("unknown placeholder {{{{{name}}}}}")))?;
        let value = strip_invalid_chars(&value);
        out.push_str(&escape(&*value));
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

// XML 1.0 Char production: tab, LF, CR and everything from U+0020 except
// the noncharacters U+FFFE and U+FFFF. Surrogates cannot occur in a `str`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn strip_invalid_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return Cow::Borrowed(value);
    }
    tracing::warn!("dropping characters not allowed in XML from metadata value");
    Cow::Owned(value.chars().filter(|&c| is_xml_char(c)).collect())
}
