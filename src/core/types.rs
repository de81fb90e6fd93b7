use serde::{Deserialize, Serialize};

/// ZUGFeRD / Factur-X conformance profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZugferdProfile {
    /// Minimal machine-readable data (no line items).
    Minimum,
    /// Basic data without line items.
    BasicWl,
    /// Basic with line items.
    Basic,
    /// Full EN 16931 European norm (formerly "Comfort").
    EN16931,
    /// Extended profile (beyond EN 16931).
    Extended,
    /// XRechnung profile (German public sector).
    XRechnung,
}

impl ZugferdProfile {
    /// The XMP `ConformanceLevel` value declared for this profile.
    pub fn conformance_level(&self) -> &'static str {
        match self {
            Self::Minimum => "MINIMUM",
            Self::BasicWl => "BASIC WL",
            Self::Basic => "BASIC",
            Self::EN16931 => "EN 16931",
            Self::Extended => "EXTENDED",
            Self::XRechnung => "XRECHNUNG",
        }
    }
}

/// ZUGFeRD generation. Selects the XMP extension schema written to the PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZugferdVersion {
    /// ZUGFeRD 1.0.
    V1,
    /// ZUGFeRD 2.0.
    V20,
    /// ZUGFeRD 2.1 and later, identical to Factur-X 1.0.
    #[default]
    V23,
}

impl ZugferdVersion {
    /// Namespace URI of the XMP extension schema.
    pub fn xmp_namespace(&self) -> &'static str {
        match self {
            Self::V1 => "urn:ferd:pdfa:CrossIndustryDocument:invoice:1p0#",
            Self::V20 => "urn:zugferd:pdfa:CrossIndustryDocument:invoice:2p0#",
            Self::V23 => "urn:factur-x:pdfa:CrossIndustryDocument:invoice:1p0#",
        }
    }

    /// Value of the XMP `Version` property.
    pub fn xmp_version(&self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V20 => "2p0",
            Self::V23 => "1.0",
        }
    }
}

/// Syntax of the serialized invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZugferdFormat {
    /// UN/CEFACT Cross Industry Invoice.
    #[default]
    Cii,
    /// OASIS Universal Business Language.
    Ubl,
}

/// Version / profile / format triple handed to the invoice serializer and
/// used to derive the XMP conformance declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceSelector {
    pub version: ZugferdVersion,
    pub profile: ZugferdProfile,
    pub format: ZugferdFormat,
}

impl InvoiceSelector {
    /// Factur-X 1.0 / ZUGFeRD 2.3 CII with the given profile.
    pub fn new(profile: ZugferdProfile) -> Self {
        Self {
            version: ZugferdVersion::default(),
            profile,
            format: ZugferdFormat::default(),
        }
    }

    pub fn version(mut self, version: ZugferdVersion) -> Self {
        self.version = version;
        self
    }

    pub fn format(mut self, format: ZugferdFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<ZugferdProfile> for InvoiceSelector {
    fn from(profile: ZugferdProfile) -> Self {
        Self::new(profile)
    }
}
