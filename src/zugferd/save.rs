//! Stream- and path-based entry points.
//!
//! These validate that both inputs are present before any work starts,
//! serialize the invoice, assemble the whole document in memory and only
//! then write it out, so a failed call never leaves a partial document in
//! the target.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use super::assemble::FacturXAssembler;
use super::options::AssemblyOptions;
use crate::core::{FacturXError, InvoiceSelector};
use crate::resources::ResourceLoader;

/// Produces the XML representation of an invoice.
///
/// The invoice model and its CII/UBL serialization live outside this crate;
/// implement this trait for your invoice type. Pre-serialized XML (`[u8]`,
/// `Vec<u8>`, `str`, `String`) is accepted as-is and ignores the selector.
pub trait InvoiceSerializer {
    fn serialize(&self, selector: &InvoiceSelector, out: &mut dyn Write)
    -> Result<(), FacturXError>;
}

impl InvoiceSerializer for [u8] {
    fn serialize(&self, _: &InvoiceSelector, out: &mut dyn Write) -> Result<(), FacturXError> {
        Ok(out.write_all(self)?)
    }
}

impl InvoiceSerializer for Vec<u8> {
    fn serialize(&self, selector: &InvoiceSelector, out: &mut dyn Write) -> Result<(), FacturXError> {
        self.as_slice().serialize(selector, out)
    }
}

impl InvoiceSerializer for str {
    fn serialize(&self, selector: &InvoiceSelector, out: &mut dyn Write) -> Result<(), FacturXError> {
        self.as_bytes().serialize(selector, out)
    }
}

impl InvoiceSerializer for String {
    fn serialize(&self, selector: &InvoiceSelector, out: &mut dyn Write) -> Result<(), FacturXError> {
        self.as_bytes().serialize(selector, out)
    }
}

impl<L: ResourceLoader> FacturXAssembler<L> {
    /// Read the base PDF from `pdf_source`, serialize `invoice` and write the
    /// hybrid PDF to `target`.
    ///
    /// An absent source or invoice is an [`FacturXError::InvalidInput`].
    pub fn save<W, R, S>(
        &self,
        target: &mut W,
        selector: &InvoiceSelector,
        pdf_source: Option<R>,
        invoice: Option<&S>,
    ) -> Result<(), FacturXError>
    where
        W: Write + ?Sized,
        R: Read,
        S: InvoiceSerializer + ?Sized,
    {
        let bytes = self.prepare(selector, pdf_source, invoice)?;
        target.write_all(&bytes)?;
        target.flush()?;
        Ok(())
    }

    /// Path variant of [`save`](Self::save). A missing source file is an
    /// I/O `NotFound` error.
    pub fn save_to_path<S>(
        &self,
        target_path: impl AsRef<Path>,
        pdf_source_path: impl AsRef<Path>,
        selector: &InvoiceSelector,
        invoice: Option<&S>,
    ) -> Result<(), FacturXError>
    where
        S: InvoiceSerializer + ?Sized,
    {
        let source = pdf_source_path.as_ref();
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", source.display()),
            )
            .into());
        }
        let Some(invoice) = invoice else {
            return Err(FacturXError::InvalidInput("missing invoice".into()));
        };

        let reader = BufReader::new(File::open(source)?);
        let bytes = self.prepare(selector, Some(reader), Some(invoice))?;
        fs::write(target_path, bytes)?;
        Ok(())
    }

    /// Like [`save`](Self::save), writing to an async sink. Assembly itself
    /// is synchronous; only the final copy is awaited.
    #[cfg(feature = "tokio")]
    pub async fn save_async<W, R, S>(
        &self,
        target: &mut W,
        selector: &InvoiceSelector,
        pdf_source: Option<R>,
        invoice: Option<&S>,
    ) -> Result<(), FacturXError>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
        R: Read,
        S: InvoiceSerializer + ?Sized,
    {
        use tokio::io::AsyncWriteExt;

        let bytes = self.prepare(selector, pdf_source, invoice)?;
        target.write_all(&bytes).await?;
        target.flush().await?;
        Ok(())
    }

    fn prepare<R, S>(
        &self,
        selector: &InvoiceSelector,
        pdf_source: Option<R>,
        invoice: Option<&S>,
    ) -> Result<Vec<u8>, FacturXError>
    where
        R: Read,
        S: InvoiceSerializer + ?Sized,
    {
        let Some(mut pdf_source) = pdf_source else {
            return Err(FacturXError::InvalidInput("missing PDF source".into()));
        };
        let Some(invoice) = invoice else {
            return Err(FacturXError::InvalidInput("missing invoice".into()));
        };

        let mut xml = Vec::new();
        invoice.serialize(selector, &mut xml)?;

        let mut pdf = Vec::new();
        pdf_source.read_to_end(&mut pdf)?;

        self.assemble(&pdf, &xml, selector)
    }
}

/// [`FacturXAssembler::save`] with the bundled resources.
pub fn save<W, R, S>(
    target: &mut W,
    selector: &InvoiceSelector,
    pdf_source: Option<R>,
    invoice: Option<&S>,
    options: &AssemblyOptions,
) -> Result<(), FacturXError>
where
    W: Write + ?Sized,
    R: Read,
    S: InvoiceSerializer + ?Sized,
{
    FacturXAssembler::new(options.clone()).save(target, selector, pdf_source, invoice)
}

/// [`FacturXAssembler::save_to_path`] with the bundled resources.
pub fn save_to_path<S>(
    target_path: impl AsRef<Path>,
    pdf_source_path: impl AsRef<Path>,
    selector: &InvoiceSelector,
    invoice: Option<&S>,
    options: &AssemblyOptions,
) -> Result<(), FacturXError>
where
    S: InvoiceSerializer + ?Sized,
{
    FacturXAssembler::new(options.clone()).save_to_path(
        target_path,
        pdf_source_path,
        selector,
        invoice,
    )
}
