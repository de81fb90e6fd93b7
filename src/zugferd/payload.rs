use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::core::FacturXError;

/// The XML invoice together with the values derived from it for embedding.
///
/// Checksum and length always describe `raw`; `encoded` is what is stored
/// in the PDF stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPayload {
    raw: Vec<u8>,
    checksum: String,
    encoded: Vec<u8>,
}

impl XmlPayload {
    pub fn new(raw: impl Into<Vec<u8>>) -> Result<Self, FacturXError> {
        let raw = raw.into();
        let checksum = md5_hex(&raw);
        let encoded = flate_encode(&raw)?;
        Ok(Self {
            raw,
            checksum,
            encoded,
        })
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Uncompressed length in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Lowercase hex MD5 of the uncompressed bytes.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// `/FlateDecode` encoding of the bytes.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn into_encoded(self) -> Vec<u8> {
        self.encoded
    }
}

/// Lowercase hex MD5 digest, no separators.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

/// zlib-wrapped deflate at the default level, as expected by `/FlateDecode`.
pub fn flate_encode(bytes: &[u8]) -> Result<Vec<u8>, FacturXError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
