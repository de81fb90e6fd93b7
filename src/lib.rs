//! # facturx
//!
//! Assembles Factur-X / ZUGFeRD hybrid invoices: a PDF/A-3 document whose
//! pages show the invoice and whose embedded `factur-x.xml` carries the same
//! invoice as structured data.
//!
//! The crate builds the PDF object graph, XMP metadata and output intent that
//! conformance checkers expect. It does not render invoices, serialize the
//! invoice model, or validate the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use facturx::zugferd::{self, AssemblyOptions, FACTURX_FILENAME};
//! use facturx::ZugferdProfile;
//! # fn blank_pdf() -> Vec<u8> {
//! #     use lopdf::{Document, Object, dictionary};
//! #     let mut doc = Document::with_version("1.7");
//! #     let pages_id = doc.new_object_id();
//! #     let page_id = doc.add_object(dictionary! {
//! #         "Type" => "Page",
//! #         "Parent" => Object::Reference(pages_id),
//! #         "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
//! #     });
//! #     doc.objects.insert(pages_id, Object::Dictionary(dictionary! {
//! #         "Type" => "Pages",
//! #         "Kids" => vec![Object::Reference(page_id)],
//! #         "Count" => 1,
//! #     }));
//! #     let catalog_id = doc.add_object(dictionary! {
//! #         "Type" => "Catalog",
//! #         "Pages" => Object::Reference(pages_id),
//! #     });
//! #     doc.trailer.set("Root", Object::Reference(catalog_id));
//! #     let mut out = Vec::new();
//! #     doc.save_to(&mut out).unwrap();
//! #     out
//! # }
//!
//! let pdf = blank_pdf();
//! let xml = b"<rsm:CrossIndustryInvoice/>";
//!
//! let hybrid = zugferd::embed_in_pdf(&pdf, xml, ZugferdProfile::EN16931, &AssemblyOptions::new())?;
//!
//! let attachment = zugferd::extract_attachment(&hybrid, FACTURX_FILENAME)?;
//! assert_eq!(attachment.data, xml);
//! assert!(attachment.checksum_matches());
//! # Ok::<(), facturx::FacturXError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tokio` | `FacturXAssembler::save_async` for `tokio::io::AsyncWrite` targets |

pub mod core;
pub mod pdf;
pub mod resources;
pub mod zugferd;

// Re-export core types at crate root for convenience
pub use crate::core::*;
