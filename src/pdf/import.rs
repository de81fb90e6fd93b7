//! Page import from the base PDF into a fresh output document.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::core::FacturXError;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic `/Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

/// A new document holding the imported pages under a single flat `/Pages` node.
#[derive(Debug)]
pub struct ImportedPages {
    pub document: Document,
    pub pages_id: ObjectId,
    pub page_count: usize,
}

/// Copy every page of `source`, in order, into a new PDF 1.7 document.
///
/// Object numbers of the source are kept. The source page tree is replaced
/// by one `/Pages` node, so inheritable attributes are copied onto each page.
/// The catalog, page-tree nodes, outlines and cross-reference/object streams
/// are left behind.
pub fn import_pages(source: Document) -> Result<ImportedPages, FacturXError> {
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
    if page_ids.is_empty() {
        return Err(FacturXError::Structure("base PDF has no pages".into()));
    }

    let mut pages = Vec::with_capacity(page_ids.len());
    for &id in &page_ids {
        let mut page = source.get_dictionary(id)?.clone();
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(&source, &page, key) {
                page.set(key.to_vec(), value);
            }
        }
        if !page.has(b"MediaBox") {
            warn!(?id, "page has no MediaBox");
        }
        pages.push((id, page));
    }

    let mut document = Document::with_version("1.7");
    document.max_id = source.max_id;
    for (id, object) in source.objects {
        match object.type_name().unwrap_or("") {
            "Catalog" | "Pages" | "Outlines" | "Outline" | "ObjStm" | "XRef" => {}
            _ => {
                document.objects.insert(id, object);
            }
        }
    }

    let pages_id = document.new_object_id();
    let kids = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    let page_count = pages.len();
    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        document.objects.insert(id, Object::Dictionary(page));
    }
    document.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(page_count as i64)),
        ])),
    );

    debug!(page_count, "imported pages from base PDF");
    Ok(ImportedPages {
        document,
        pages_id,
        page_count,
    })
}

fn inherited(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    for _ in 0..MAX_TREE_DEPTH {
        let node = source.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}
