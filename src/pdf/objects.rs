//! Typed builders for the PDF objects written during assembly.
//!
//! Each builder carries exactly the fields the PDF and PDF/A-3 references
//! define for its object kind. Cross-object pointers are [`Handle`]s into an
//! [`ObjectGraph`](super::ObjectGraph) and become indirect references only
//! when the graph is committed.

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Object, Stream, dictionary};

use super::date::pdf_date;
use super::graph::{Handle, Resolved};
use super::text::text_string;
use crate::core::FacturXError;

/// Stream filter applied to pre-encoded stream content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamFilter {
    /// zlib/deflate, `/FlateDecode`.
    #[default]
    Flate,
}

impl StreamFilter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flate => "FlateDecode",
        }
    }
}

/// Value of a file specification's `/AFRelationship` entry (PDF/A-3, ISO 32000-2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfRelationship {
    Source,
    /// Structured data the visual rendition is based on. Used for Factur-X.
    #[default]
    Data,
    Alternative,
    Supplement,
    Unspecified,
}

impl AfRelationship {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Data => "Data",
            Self::Alternative => "Alternative",
            Self::Supplement => "Supplement",
            Self::Unspecified => "Unspecified",
        }
    }
}

/// `/Params` of an embedded file stream.
///
/// `checksum` and `size` describe the uncompressed payload, never the bytes
/// stored in the stream.
#[derive(Debug, Clone)]
pub struct EmbeddedFileParams {
    /// Lowercase hex MD5 of the uncompressed payload.
    pub checksum: String,
    pub mod_date: DateTime<Utc>,
    /// Uncompressed length in bytes.
    pub size: usize,
}

/// `/Type /EmbeddedFile` stream.
#[derive(Debug, Clone)]
pub struct EmbeddedFile {
    pub mime_type: String,
    pub filter: StreamFilter,
    /// Stream content, already encoded with `filter`.
    pub encoded: Vec<u8>,
    pub params: EmbeddedFileParams,
}

impl EmbeddedFile {
    fn into_object(self) -> Object {
        let params = dictionary! {
            "CheckSum" => Object::string_literal(self.params.checksum),
            "ModDate" => Object::string_literal(pdf_date(&self.params.mod_date)),
            "Size" => Object::Integer(self.params.size as i64),
        };
        let dict = dictionary! {
            "Filter" => self.filter.name(),
            "Type" => "EmbeddedFile",
            "Params" => params,
            "Subtype" => Object::Name(self.mime_type.into_bytes()),
        };
        encoded_stream(dict, self.encoded)
    }
}

/// `/Type /Filespec` dictionary. Both `/EF` slots point at the same
/// embedded file.
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub filename: String,
    pub description: String,
    pub relationship: AfRelationship,
    pub embedded_file: Handle,
}

impl FileSpec {
    fn into_object(self, ids: &Resolved) -> Result<Object, FacturXError> {
        let ef = ids.reference(self.embedded_file)?;
        Ok(Object::Dictionary(dictionary! {
            "AFRelationship" => self.relationship.name(),
            "Desc" => text_string(&self.description),
            "Type" => "Filespec",
            "F" => text_string(&self.filename),
            "EF" => dictionary! {
                "F" => ef.clone(),
                "UF" => ef,
            },
            "UF" => text_string(&self.filename),
        }))
    }
}

/// `/Type /Metadata /Subtype /XML` stream holding an encoded XMP packet.
#[derive(Debug, Clone)]
pub struct MetadataStream {
    pub filter: StreamFilter,
    pub encoded: Vec<u8>,
}

impl MetadataStream {
    fn into_object(self) -> Object {
        let dict = dictionary! {
            "Filter" => self.filter.name(),
            "Subtype" => "XML",
            "Type" => "Metadata",
        };
        encoded_stream(dict, self.encoded)
    }
}

/// ICC-based colour profile stream, stored unfiltered.
#[derive(Debug, Clone)]
pub struct IccProfileStream {
    /// Number of colour components (`/N`): 1, 3 or 4.
    pub components: u8,
    pub data: Vec<u8>,
}

impl IccProfileStream {
    fn into_object(self) -> Object {
        let dict = dictionary! {
            "N" => Object::Integer(i64::from(self.components)),
        };
        encoded_stream(dict, self.data)
    }
}

/// `/S` entry of an output intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputIntentSubtype {
    /// `GTS_PDFA1`, used by every PDF/A part.
    #[default]
    PdfA,
}

impl OutputIntentSubtype {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PdfA => "GTS_PDFA1",
        }
    }
}

/// `/Type /OutputIntent` dictionary.
#[derive(Debug, Clone)]
pub struct OutputIntent {
    pub subtype: OutputIntentSubtype,
    pub condition_identifier: String,
    pub dest_output_profile: Handle,
}

impl OutputIntent {
    fn into_object(self, ids: &Resolved) -> Result<Object, FacturXError> {
        Ok(Object::Dictionary(dictionary! {
            "DestOutputProfile" => ids.reference(self.dest_output_profile)?,
            "OutputConditionIdentifier" => text_string(&self.condition_identifier),
            "S" => self.subtype.name(),
            "Type" => "OutputIntent",
        }))
    }
}

/// Any object that can live in an [`ObjectGraph`](super::ObjectGraph).
#[derive(Debug, Clone)]
pub enum PdfNode {
    EmbeddedFile(EmbeddedFile),
    FileSpec(FileSpec),
    /// Array of indirect references, e.g. the associated-files array.
    ReferenceArray(Vec<Handle>),
    Metadata(MetadataStream),
    ColorProfile(IccProfileStream),
    OutputIntent(OutputIntent),
}

impl PdfNode {
    /// Handles this node points at.
    pub fn references(&self) -> Vec<Handle> {
        match self {
            Self::FileSpec(fs) => vec![fs.embedded_file],
            Self::ReferenceArray(items) => items.clone(),
            Self::OutputIntent(oi) => vec![oi.dest_output_profile],
            Self::EmbeddedFile(_) | Self::Metadata(_) | Self::ColorProfile(_) => Vec::new(),
        }
    }

    pub(crate) fn into_object(self, ids: &Resolved) -> Result<Object, FacturXError> {
        match self {
            Self::EmbeddedFile(ef) => Ok(ef.into_object()),
            Self::FileSpec(fs) => fs.into_object(ids),
            Self::ReferenceArray(items) => items
                .into_iter()
                .map(|h| ids.reference(h))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::Array),
            Self::Metadata(md) => Ok(md.into_object()),
            Self::ColorProfile(icc) => Ok(icc.into_object()),
            Self::OutputIntent(oi) => oi.into_object(ids),
        }
    }
}

impl From<EmbeddedFile> for PdfNode {
    fn from(v: EmbeddedFile) -> Self {
        Self::EmbeddedFile(v)
    }
}

impl From<FileSpec> for PdfNode {
    fn from(v: FileSpec) -> Self {
        Self::FileSpec(v)
    }
}

impl From<MetadataStream> for PdfNode {
    fn from(v: MetadataStream) -> Self {
        Self::Metadata(v)
    }
}

impl From<IccProfileStream> for PdfNode {
    fn from(v: IccProfileStream) -> Self {
        Self::ColorProfile(v)
    }
}

impl From<OutputIntent> for PdfNode {
    fn from(v: OutputIntent) -> Self {
        Self::OutputIntent(v)
    }
}

// Content is final; lopdf must not re-compress it on save.
fn encoded_stream(dict: Dictionary, content: Vec<u8>) -> Object {
    Object::Stream(Stream::new(dict, content).with_compression(false))
}
