use std::borrow::Cow;

use lopdf::{Document, Object, StringFormat, dictionary};
use tracing::{debug, info, warn};

use super::options::AssemblyOptions;
use super::payload::{XmlPayload, flate_encode, md5_hex};
use super::xmp::{self, XmpFields};
use crate::core::{FacturXError, InvoiceSelector};
use crate::pdf::{
    AfRelationship, EmbeddedFile, EmbeddedFileParams, FileSpec, IccProfileStream, ImportedPages,
    MetadataStream, ObjectGraph, OutputIntent, OutputIntentSubtype, PdfNode, StreamFilter,
    import_pages, pdf_date, text_string,
};
use crate::resources::{
    BundledResources, METADATA_TEMPLATE, ResourceLoader, SRGB_DESCRIPTION, SRGB_PROFILE,
};

/// Builds Factur-X / ZUGFeRD PDF/A-3 documents from a rendered PDF and an
/// XML invoice.
///
/// The assembler holds no per-document state; one instance can serve any
/// number of calls, including concurrent ones.
#[derive(Debug, Clone)]
pub struct FacturXAssembler<L = BundledResources> {
    loader: L,
    options: AssemblyOptions,
}

impl FacturXAssembler<BundledResources> {
    /// Assembler using the resources compiled into the crate.
    pub fn new(options: AssemblyOptions) -> Self {
        Self::with_loader(BundledResources, options)
    }
}

impl Default for FacturXAssembler<BundledResources> {
    fn default() -> Self {
        Self::new(AssemblyOptions::default())
    }
}

impl<L: ResourceLoader> FacturXAssembler<L> {
    pub fn with_loader(loader: L, options: AssemblyOptions) -> Self {
        Self { loader, options }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Produce the hybrid PDF.
    ///
    /// The pages of `pdf_bytes` are copied in order into a new PDF 1.7
    /// document, `xml` is attached as the invoice file (reachable through
    /// both `/AF` and `/Names/EmbeddedFiles`), and the XMP metadata and
    /// sRGB output intent required by PDF/A-3 are added.
    pub fn assemble(
        &self,
        pdf_bytes: &[u8],
        xml: &[u8],
        selector: &InvoiceSelector,
    ) -> Result<Vec<u8>, FacturXError> {
        if pdf_bytes.is_empty() {
            return Err(FacturXError::InvalidInput("base PDF is empty".into()));
        }
        if xml.is_empty() {
            warn!("embedding an empty XML invoice");
        }

        let template = self.resource(METADATA_TEMPLATE)?;
        let icc = self.resource(SRGB_PROFILE)?;
        let options = &self.options;
        let now = options.now();

        let ImportedPages {
            mut document,
            pages_id,
            page_count,
        } = import_pages(Document::load_mem(pdf_bytes)?)?;

        let payload = XmlPayload::new(xml)?;
        let checksum = payload.checksum().to_string();
        debug!(
            size = payload.len(),
            encoded = payload.encoded().len(),
            checksum = %checksum,
            "prepared XML payload"
        );

        let mut graph = ObjectGraph::new();
        let embedded = graph.insert(EmbeddedFile {
            mime_type: "text/xml".into(),
            filter: StreamFilter::Flate,
            params: EmbeddedFileParams {
                checksum: checksum.clone(),
                mod_date: now,
                size: payload.len(),
            },
            encoded: payload.into_encoded(),
        });
        let filespec = graph.insert(FileSpec {
            filename: options.filename.clone(),
            description: options.attachment_description.clone(),
            relationship: AfRelationship::Data,
            embedded_file: embedded,
        });
        let associated_files = graph.insert(PdfNode::ReferenceArray(vec![filespec]));

        let xmp = xmp::render(
            &template,
            &XmpFields {
                filename: &options.filename,
                title: &options.title,
                description: &options.description,
                creator_tool: &options.creator,
                producer: &options.creator,
                version: selector.version,
                profile: selector.profile,
                created: now,
                modified: now,
            },
        )?;
        let metadata = graph.insert(MetadataStream {
            filter: StreamFilter::Flate,
            encoded: flate_encode(xmp.as_bytes())?,
        });

        let color_profile = graph.insert(IccProfileStream {
            components: 3,
            data: icc.into_owned(),
        });
        let output_intent = graph.insert(OutputIntent {
            subtype: OutputIntentSubtype::PdfA,
            condition_identifier: SRGB_DESCRIPTION.to_string(),
            dest_output_profile: color_profile,
        });

        let ids = graph.commit(&mut document)?;

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
            "AF" => ids.reference(associated_files)?,
            "Metadata" => ids.reference(metadata)?,
            "Names" => dictionary! {
                "EmbeddedFiles" => dictionary! {
                    "Names" => vec![text_string(&options.filename), ids.reference(filespec)?],
                },
            },
            "OutputIntents" => vec![ids.reference(output_intent)?],
        });

        let date = pdf_date(&now);
        let info_id = document.add_object(dictionary! {
            "Title" => text_string(&options.title),
            "Subject" => text_string(&options.description),
            "Creator" => text_string(&options.creator),
            "Producer" => text_string(&options.creator),
            "CreationDate" => Object::string_literal(date.clone()),
            "ModDate" => Object::string_literal(date.clone()),
        });

        let source_digest = md5_hex(pdf_bytes);
        let file_id = md5::compute(format!(
            "{source_digest}|{checksum}|{date}|{}",
            options.filename
        ));
        let file_id = Object::String(file_id.0.to_vec(), StringFormat::Hexadecimal);
        document.trailer.set("Root", Object::Reference(catalog_id));
        document.trailer.set("Info", Object::Reference(info_id));
        document.trailer.set("ID", vec![file_id.clone(), file_id]);

        let pruned = document.prune_objects();
        if !pruned.is_empty() {
            debug!(count = pruned.len(), "pruned objects unreachable from the new catalog");
        }

        let mut output = Vec::new();
        document.save_to(&mut output)?;

        info!(
            pages = page_count,
            bytes = output.len(),
            profile = selector.profile.conformance_level(),
            "assembled Factur-X PDF"
        );
        Ok(output)
    }

    fn resource(&self, name: &str) -> Result<Cow<'static, [u8]>, FacturXError> {
        self.loader.load(name).ok_or_else(|| {
            warn!(resource = name, "resource missing");
            FacturXError::MissingResource(name.to_string())
        })
    }
}

/// Embed `xml` into `pdf_bytes` using the bundled resources.
///
/// Shorthand for [`FacturXAssembler::assemble`].
pub fn embed_in_pdf(
    pdf_bytes: &[u8],
    xml: &[u8],
    selector: impl Into<InvoiceSelector>,
    options: &AssemblyOptions,
) -> Result<Vec<u8>, FacturXError> {
    FacturXAssembler::new(options.clone()).assemble(pdf_bytes, xml, &selector.into())
}
