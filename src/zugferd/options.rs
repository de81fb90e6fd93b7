use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FACTURX_FILENAME;

/// Application identifier written to `/Creator`, `/Producer` and the XMP
/// packet.
pub const APPLICATION_NAME: &str = concat!("facturx ", env!("CARGO_PKG_VERSION"));

/// Per-call settings of the assembler. Every field has a default, so the
/// struct can be deserialized from a partial configuration.
///
/// ```
/// use facturx::zugferd::AssemblyOptions;
///
/// let options = AssemblyOptions::new()
///     .title("Rechnung RE-2024-001")
///     .description("Rechnung vom 15.06.2024");
/// assert_eq!(options.filename, "factur-x.xml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyOptions {
    /// Document title (`dc:title`, `/Title`).
    pub title: String,
    /// Document description (`dc:description`, `/Subject`).
    pub description: String,
    /// Name of the embedded XML file.
    pub filename: String,
    /// `/Desc` of the file specification.
    pub attachment_description: String,
    /// `/Creator` and `/Producer` of the output document.
    pub creator: String,
    /// Instant used for every timestamp in the output. `None` samples the
    /// clock once per assembly.
    #[serde(skip)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            title: "Invoice".to_string(),
            description: "Invoice description".to_string(),
            filename: FACTURX_FILENAME.to_string(),
            attachment_description: "Factur-X XML file".to_string(),
            creator: APPLICATION_NAME.to_string(),
            timestamp: None,
        }
    }
}

impl AssemblyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn attachment_description(mut self, description: impl Into<String>) -> Self {
        self.attachment_description = description.into();
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Fix the clock; identical inputs then give byte-identical output.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }
}
