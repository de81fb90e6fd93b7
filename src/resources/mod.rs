//! Static resources needed by the assembler: the XMP metadata template and
//! the ICC colour profile for the PDF/A output intent.
//!
//! Resources are looked up by logical name through [`ResourceLoader`].
//! [`BundledResources`] serves the copies compiled into the crate from a
//! process-wide map that is built on first use and never mutated.

mod icc;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

pub use icc::SRGB_DESCRIPTION;

/// Logical name of the XMP metadata template.
pub const METADATA_TEMPLATE: &str = "PdfMetadataTemplate.xml";

/// Logical name of the sRGB ICC profile.
pub const SRGB_PROFILE: &str = "sRGB-IEC61966-2.1.icc";

static BUNDLED: LazyLock<HashMap<&'static str, Vec<u8>>> = LazyLock::new(|| {
    tracing::debug!("initialising bundled resources");
    HashMap::from([
        (
            METADATA_TEMPLATE,
            include_str!("PdfMetadataTemplate.xml").as_bytes().to_vec(),
        ),
        (SRGB_PROFILE, icc::srgb_profile()),
    ])
});

/// Source of named binary resources.
///
/// Returns `None` when the resource does not exist; the caller decides
/// whether that is fatal.
pub trait ResourceLoader {
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for &L {
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        (**self).load(name)
    }
}

/// Resources compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResources;

impl ResourceLoader for BundledResources {
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        let bundled: &'static HashMap<&'static str, Vec<u8>> = &BUNDLED;
        bundled.get(name).map(|bytes| Cow::Borrowed(bytes.as_slice()))
    }
}

/// Caller-supplied resources layered over the bundled set.
///
/// ```
/// use facturx::resources::{ResourceLoader, ResourceMap, SRGB_PROFILE};
///
/// let resources = ResourceMap::new().with_resource(SRGB_PROFILE, vec![0u8; 16]);
/// assert_eq!(resources.load(SRGB_PROFILE).unwrap().len(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct ResourceMap {
    entries: HashMap<String, Vec<u8>>,
    fallback: bool,
}

impl ResourceMap {
    /// Overrides on top of [`BundledResources`].
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: true,
        }
    }

    /// Only the resources added explicitly; no bundled fallback.
    pub fn isolated() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: false,
        }
    }

    pub fn with_resource(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }
}

impl Default for ResourceMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for ResourceMap {
    fn load(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        match self.entries.get(name) {
            Some(bytes) => Some(Cow::Owned(bytes.clone())),
            None if self.fallback => BundledResources.load(name),
            None => None,
        }
    }
}
