//! PDF object plumbing on top of `lopdf`: the object arena, typed object
//! builders, page import and the string/date encodings PDF requires.

mod date;
mod graph;
mod import;
mod objects;
mod text;

pub use date::{pdf_date, xmp_date};
pub use graph::{Handle, ObjectGraph, Resolved};
pub use import::{ImportedPages, import_pages};
pub use objects::{
    AfRelationship, EmbeddedFile, EmbeddedFileParams, FileSpec, IccProfileStream, MetadataStream,
    OutputIntent, OutputIntentSubtype, PdfNode, StreamFilter,
};
pub use text::{decode_text, text_string};
