//! Handle-based arena for the objects added during assembly.
//!
//! Objects are inserted before they have an object number. Cross-references
//! between them are [`Handle`] copies; [`ObjectGraph::commit`] allocates
//! object ids in insertion order and rewrites every handle into an indirect
//! reference.

use lopdf::{Document, Object, ObjectId};

use super::objects::PdfNode;
use crate::core::FacturXError;

/// Stable index of an object inside an [`ObjectGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug, Default)]
pub struct ObjectGraph {
    nodes: Vec<PdfNode>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: impl Into<PdfNode>) -> Handle {
        self.nodes.push(node.into());
        Handle(self.nodes.len() - 1)
    }

    /// Add every object to `doc` and return the handle → id mapping.
    ///
    /// All handles are checked before the first id is allocated, so a graph
    /// with a dangling handle leaves `doc` untouched.
    pub fn commit(self, doc: &mut Document) -> Result<Resolved, FacturXError> {
        for node in &self.nodes {
            if let Some(bad) = node.references().into_iter().find(|h| h.0 >= self.nodes.len()) {
                return Err(FacturXError::DanglingHandle(bad.0));
            }
        }

        let resolved = Resolved {
            ids: self.nodes.iter().map(|_| doc.new_object_id()).collect(),
        };
        for (index, node) in self.nodes.into_iter().enumerate() {
            let object = node.into_object(&resolved)?;
            doc.objects.insert(resolved.ids[index], object);
        }
        tracing::debug!(objects = resolved.ids.len(), "committed object graph");
        Ok(resolved)
    }
}

/// Object ids assigned by [`ObjectGraph::commit`].
#[derive(Debug, Clone)]
pub struct Resolved {
    ids: Vec<ObjectId>,
}

impl Resolved {
    pub fn id(&self, handle: Handle) -> Result<ObjectId, FacturXError> {
        self.ids
            .get(handle.0)
            .copied()
            .ok_or(FacturXError::DanglingHandle(handle.0))
    }

    /// Indirect reference to the object behind `handle`.
    pub fn reference(&self, handle: Handle) -> Result<Object, FacturXError> {
        self.id(handle).map(Object::Reference)
    }
}
