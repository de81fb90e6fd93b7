use chrono::{TimeZone, Utc};
use facturx::zugferd::{self, AssemblyOptions, FACTURX_FILENAME, FacturXAssembler, md5_hex};
use facturx::{FacturXError, InvoiceSelector, ZugferdProfile, ZugferdVersion};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

const XML: &[u8] = b"<Invoice>test</Invoice>";

/// Create a PDF with one page per entry of `texts`, each with its own
/// content stream.
fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id),
        },
    });

    let mut kids = Vec::new();
    for text in texts {
        let content = Stream::new(
            dictionary! {},
            format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET").into_bytes(),
        );
        let content_id = doc.add_object(content);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        kids.push(Object::Reference(page_id));
    }
    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("save fixture PDF");
    output
}

fn blank_pdf() -> Vec<u8> {
    pdf_with_pages(&[""])
}

fn fixed_options() -> AssemblyOptions {
    AssemblyOptions::new().timestamp(Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap())
}

fn assemble(pdf: &[u8], xml: &[u8]) -> Document {
    let out = zugferd::embed_in_pdf(pdf, xml, ZugferdProfile::EN16931, &fixed_options()).unwrap();
    Document::load_mem(&out).unwrap()
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap(),
        other => other,
    }
}

fn dict<'a>(doc: &'a Document, obj: &'a Object) -> &'a Dictionary {
    deref(doc, obj).as_dict().unwrap()
}

fn string(obj: &Object) -> String {
    match obj {
        Object::String(bytes, _) => String::from_utf8(bytes.clone()).unwrap(),
        other => panic!("expected string, got {other:?}"),
    }
}

fn filespec(doc: &Document) -> &Dictionary {
    let catalog = doc.catalog().unwrap();
    let af = deref(doc, catalog.get(b"AF").unwrap()).as_array().unwrap();
    assert_eq!(af.len(), 1);
    dict(doc, &af[0])
}

fn embedded_stream(doc: &Document) -> &Stream {
    let ef = dict(doc, filespec(doc).get(b"EF").unwrap());
    deref(doc, ef.get(b"F").unwrap()).as_stream().unwrap()
}

// ---------------------------------------------------------------------------
// Scenario: 1-page blank PDF + <Invoice>test</Invoice>
// ---------------------------------------------------------------------------

#[test]
fn blank_page_scenario() {
    let doc = assemble(&blank_pdf(), XML);
    assert_eq!(doc.get_pages().len(), 1);

    let stream = embedded_stream(&doc);
    let params = stream.dict.get(b"Params").unwrap().as_dict().unwrap();
    assert_eq!(params.get(b"Size").unwrap().as_i64().unwrap(), XML.len() as i64);
    assert_eq!(
        string(params.get(b"CheckSum").unwrap()),
        "4cf756f235539b3a9bbd43761f0f90b0"
    );
    assert_eq!(stream.decompressed_content().unwrap(), XML);
}

#[test]
fn embedded_file_stream_fields() {
    let doc = assemble(&blank_pdf(), XML);
    let stream = embedded_stream(&doc);

    assert_eq!(stream.dict.get(b"Type").unwrap().as_name().unwrap(), b"EmbeddedFile");
    assert_eq!(stream.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"text/xml");
    assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
    // Stored bytes are compressed, not the raw XML.
    assert_ne!(stream.content, XML);

    let params = stream.dict.get(b"Params").unwrap().as_dict().unwrap();
    assert_eq!(string(params.get(b"ModDate").unwrap()), "D:20240615143000+00'00'");
}

#[test]
fn checksum_describes_uncompressed_payload() {
    let xml = "<rsm:CrossIndustryInvoice>".repeat(50);
    let doc = assemble(&blank_pdf(), xml.as_bytes());
    let stream = embedded_stream(&doc);
    let params = stream.dict.get(b"Params").unwrap().as_dict().unwrap();

    let checksum = string(params.get(b"CheckSum").unwrap());
    assert_eq!(checksum, md5_hex(xml.as_bytes()));
    assert_ne!(checksum, md5_hex(&stream.content));
    assert!(checksum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

// ---------------------------------------------------------------------------
// File specification, AF, name tree
// ---------------------------------------------------------------------------

#[test]
fn filespec_fields() {
    let doc = assemble(&blank_pdf(), XML);
    let fs = filespec(&doc);

    assert_eq!(fs.get(b"Type").unwrap().as_name().unwrap(), b"Filespec");
    assert_eq!(fs.get(b"AFRelationship").unwrap().as_name().unwrap(), b"Data");
    assert_eq!(string(fs.get(b"F").unwrap()), FACTURX_FILENAME);
    assert_eq!(string(fs.get(b"UF").unwrap()), FACTURX_FILENAME);
    assert_eq!(string(fs.get(b"Desc").unwrap()), "Factur-X XML file");

    let ef = dict(&doc, fs.get(b"EF").unwrap());
    assert_eq!(
        ef.get(b"F").unwrap().as_reference().unwrap(),
        ef.get(b"UF").unwrap().as_reference().unwrap()
    );
}

#[test]
fn af_array_is_an_indirect_object() {
    let doc = assemble(&blank_pdf(), XML);
    let catalog = doc.catalog().unwrap();
    assert!(catalog.get(b"AF").unwrap().as_reference().is_ok());
}

#[test]
fn name_tree_and_af_reach_the_same_filespec() {
    let doc = assemble(&blank_pdf(), XML);
    let catalog = doc.catalog().unwrap();

    let af = deref(&doc, catalog.get(b"AF").unwrap()).as_array().unwrap();
    let via_af = af[0].as_reference().unwrap();

    let names = dict(&doc, catalog.get(b"Names").unwrap());
    let embedded_files = dict(&doc, names.get(b"EmbeddedFiles").unwrap());
    let entries = embedded_files.get(b"Names").unwrap().as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(string(&entries[0]), FACTURX_FILENAME);
    assert_eq!(entries[1].as_reference().unwrap(), via_af);
}

#[test]
fn custom_filename_and_descriptions() {
    let options = fixed_options()
        .filename("xrechnung.xml")
        .attachment_description("XRechnung XML")
        .title("Rechnung RE-1")
        .description("Rechnung für März");
    let out = zugferd::embed_in_pdf(&blank_pdf(), XML, ZugferdProfile::XRechnung, &options)
        .unwrap();
    let doc = Document::load_mem(&out).unwrap();

    let fs = filespec(&doc);
    assert_eq!(string(fs.get(b"UF").unwrap()), "xrechnung.xml");
    assert_eq!(string(fs.get(b"Desc").unwrap()), "XRechnung XML");

    let attachment = zugferd::extract_attachment(&out, "xrechnung.xml").unwrap();
    assert_eq!(attachment.data, XML);
    assert!(zugferd::extract_attachment(&out, FACTURX_FILENAME).is_err());
}

// ---------------------------------------------------------------------------
// Metadata and output intent
// ---------------------------------------------------------------------------

fn xmp_of(doc: &Document) -> String {
    let catalog = doc.catalog().unwrap();
    let metadata = deref(doc, catalog.get(b"Metadata").unwrap()).as_stream().unwrap();
    assert_eq!(metadata.dict.get(b"Type").unwrap().as_name().unwrap(), b"Metadata");
    assert_eq!(metadata.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"XML");
    assert_eq!(metadata.dict.get(b"Filter").unwrap().as_name().unwrap(), b"FlateDecode");
    String::from_utf8(metadata.decompressed_content().unwrap()).unwrap()
}

#[test]
fn xmp_metadata_is_complete() {
    let options = fixed_options()
        .title("Rechnung RE-2024-001")
        .description("Beratung Juni");
    let out = zugferd::embed_in_pdf(&blank_pdf(), XML, ZugferdProfile::EN16931, &options).unwrap();
    let xmp = xmp_of(&Document::load_mem(&out).unwrap());

    assert!(!xmp.contains("{{"), "unresolved placeholder in {xmp}");
    assert!(xmp.contains("<pdfaid:part>3</pdfaid:part>"));
    assert!(xmp.contains("<pdfaid:conformance>B</pdfaid:conformance>"));
    assert!(xmp.contains("Rechnung RE-2024-001"));
    assert!(xmp.contains("Beratung Juni"));
    assert!(xmp.contains("<fx:DocumentFileName>factur-x.xml</fx:DocumentFileName>"));
    assert!(xmp.contains("<fx:ConformanceLevel>EN 16931</fx:ConformanceLevel>"));
    assert!(xmp.contains("<xmp:CreateDate>2024-06-15T14:30:00+00:00</xmp:CreateDate>"));
    assert!(xmp.contains("<xmp:ModifyDate>2024-06-15T14:30:00+00:00</xmp:ModifyDate>"));
}

#[test]
fn xmp_follows_version_and_profile() {
    let selector = InvoiceSelector::new(ZugferdProfile::XRechnung).version(ZugferdVersion::V20);
    let out = FacturXAssembler::new(fixed_options())
        .assemble(&blank_pdf(), XML, &selector)
        .unwrap();
    let xmp = xmp_of(&Document::load_mem(&out).unwrap());

    assert!(xmp.contains("XRECHNUNG"));
    assert!(xmp.contains("urn:zugferd:pdfa:CrossIndustryDocument:invoice:2p0#"));
    assert!(xmp.contains("<fx:Version>2p0</fx:Version>"));
}

#[test]
fn output_intent_with_srgb_profile() {
    let doc = assemble(&blank_pdf(), XML);
    let catalog = doc.catalog().unwrap();
    let intents = catalog.get(b"OutputIntents").unwrap().as_array().unwrap();
    assert_eq!(intents.len(), 1);

    let intent = dict(&doc, &intents[0]);
    assert_eq!(intent.get(b"Type").unwrap().as_name().unwrap(), b"OutputIntent");
    assert_eq!(intent.get(b"S").unwrap().as_name().unwrap(), b"GTS_PDFA1");
    assert_eq!(
        string(intent.get(b"OutputConditionIdentifier").unwrap()),
        "sRGB IEC61966-2.1"
    );

    let icc = deref(&doc, intent.get(b"DestOutputProfile").unwrap()).as_stream().unwrap();
    assert_eq!(icc.dict.get(b"N").unwrap().as_i64().unwrap(), 3);
    assert_eq!(&icc.content[36..40], b"acsp");
}

#[test]
fn document_info_mirrors_xmp() {
    let doc = assemble(&blank_pdf(), XML);
    let info = dict(&doc, doc.trailer.get(b"Info").unwrap());

    assert!(string(info.get(b"Creator").unwrap()).starts_with("facturx "));
    assert_eq!(string(info.get(b"Title").unwrap()), "Invoice");
    assert_eq!(string(info.get(b"Subject").unwrap()), "Invoice description");
    assert_eq!(
        string(info.get(b"CreationDate").unwrap()),
        "D:20240615143000+00'00'"
    );

    let xmp = xmp_of(&doc);
    assert!(xmp.contains(&format!(
        "<xmp:CreatorTool>{}</xmp:CreatorTool>",
        string(info.get(b"Creator").unwrap())
    )));
}

fn file_id(doc: &Document) -> Vec<u8> {
    let id = doc.trailer.get(b"ID").unwrap().as_array().unwrap();
    assert_eq!(id.len(), 2);
    match &id[0] {
        Object::String(bytes, _) => bytes.clone(),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn trailer_has_file_identifier() {
    let doc = assemble(&blank_pdf(), XML);
    assert_eq!(file_id(&doc).len(), 16);
}

#[test]
fn file_identifier_depends_on_base_pdf() {
    let first = assemble(&pdf_with_pages(&["Rechnung A"]), XML);
    let second = assemble(&pdf_with_pages(&["Rechnung B"]), XML);
    assert_ne!(file_id(&first), file_id(&second));

    let again = assemble(&pdf_with_pages(&["Rechnung A"]), XML);
    assert_eq!(file_id(&first), file_id(&again));
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[test]
fn pages_are_preserved_in_order() {
    let texts = ["Page one", "Page two", "Page three"];
    let source = pdf_with_pages(&texts);
    let doc = assemble(&source, XML);

    let pages = doc.get_pages();
    assert_eq!(pages.len(), 3);
    for (page_no, text) in (1u32..).zip(texts) {
        let content = doc.get_page_content(pages[&page_no]).unwrap();
        let expected = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        assert_eq!(content, expected.into_bytes());
    }
}

#[test]
fn source_catalog_is_replaced() {
    let doc = assemble(&pdf_with_pages(&["a", "b"]), XML);
    let catalogs = doc
        .objects
        .values()
        .filter(|o| matches!(o.type_name(), Ok("Catalog")))
        .count();
    assert_eq!(catalogs, 1);
    assert_eq!(doc.version, "1.7");
}

// ---------------------------------------------------------------------------
// Determinism and errors
// ---------------------------------------------------------------------------

#[test]
fn fixed_clock_gives_identical_output() {
    let pdf = pdf_with_pages(&["x", "y"]);
    let a = zugferd::embed_in_pdf(&pdf, XML, ZugferdProfile::Basic, &fixed_options()).unwrap();
    let b = zugferd::embed_in_pdf(&pdf, XML, ZugferdProfile::Basic, &fixed_options()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_xml_is_embedded() {
    let out = zugferd::embed_in_pdf(&blank_pdf(), b"", ZugferdProfile::Minimum, &fixed_options())
        .unwrap();
    let attachment = zugferd::extract_attachment(&out, FACTURX_FILENAME).unwrap();
    assert!(attachment.data.is_empty());
    assert_eq!(attachment.size, Some(0));
    assert!(attachment.checksum_matches());
}

#[test]
fn empty_base_pdf_is_input_error() {
    let err = zugferd::embed_in_pdf(b"", XML, ZugferdProfile::Basic, &fixed_options()).unwrap_err();
    assert!(matches!(err, FacturXError::InvalidInput(_)));
}

#[test]
fn malformed_base_pdf_propagates() {
    let err = zugferd::embed_in_pdf(b"%PDF-1.7\ngarbage", XML, ZugferdProfile::Basic, &fixed_options())
        .unwrap_err();
    assert!(!err.is_input_error());
}
