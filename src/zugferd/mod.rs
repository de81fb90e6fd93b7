//! ZUGFeRD / Factur-X PDF/A-3 assembly and extraction.
//!
//! Takes a rendered invoice PDF and the invoice XML and produces one PDF/A-3
//! document that carries the XML as `factur-x.xml`, together with the XMP
//! conformance declaration and sRGB output intent validators look for.
//!
//! # Object graph
//!
//! | Object | Reached from |
//! |--------|--------------|
//! | `/EmbeddedFile` stream (Flate) | `/EF` of the file specification |
//! | `/Filespec`, `AFRelationship /Data` | catalog `/AF` and `/Names/EmbeddedFiles` |
//! | `/Metadata` XMP stream (Flate) | catalog `/Metadata` |
//! | `/OutputIntent` `GTS_PDFA1` + ICC stream | catalog `/OutputIntents` |

mod assemble;
mod extract;
mod options;
mod payload;
mod save;
mod xmp;

pub use assemble::{FacturXAssembler, embed_in_pdf};
pub use extract::{Discovery, EmbeddedAttachment, discover, extract_attachment, extract_invoice};
pub use options::{APPLICATION_NAME, AssemblyOptions};
pub use payload::{XmlPayload, flate_encode, md5_hex};
pub use save::{InvoiceSerializer, save, save_to_path};
pub use xmp::{XmpFields, render as render_xmp};

/// The embedded XML filename per Factur-X 1.0+ specification.
pub const FACTURX_FILENAME: &str = "factur-x.xml";
