//! Chaining API for building documents from a template
//!
//! Every `with_*` call consumes the builder and returns an extended copy;
//! nothing is checked until [`BuildablePdf::build`] (or
//! [`BuildablePdf::validate`]) runs, which validates every argument before the
//! template is read.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use crate::asset::{AssetSpec, ImageSpec, QrSpec, RenderedAsset};
use crate::error::{Error, Result};
use crate::multiline::{distribute, FillMode};
use crate::pdf::renderer::{LopdfRenderer, PdfRenderer};
use crate::qr::{QrCodeRenderer, QrcodeRenderer};
use crate::substitute::ReplacementSet;
use crate::validate::{require_at_least, validate_search_key};

/// Entry point for template based document generation
///
/// # Example
///
/// ```no_run
/// use pdf_templater::{PdfBuilder, QrSpec};
///
/// PdfBuilder::from_path("documents/template.pdf")
///     .with_replacement("@name@", "Jane Doe")
///     .with_replacement("@email@", "jane@example.org")
///     .with_qr_code(QrSpec::from_code("4711").with_position(20, 50).with_size(145))
///     .build()
///     .expect("Failed to build document")
///     .save("documents/result.pdf")
///     .expect("Failed to save document");
/// ```
pub struct PdfBuilder;

impl PdfBuilder {
    /// Start from a template file, read when the document is built
    pub fn from_path(template: impl Into<PathBuf>) -> BuildablePdf {
        BuildablePdf::new(TemplateSource::Path(template.into()))
    }

    /// Start from template bytes
    pub fn from_bytes(template: impl Into<Vec<u8>>) -> BuildablePdf {
        BuildablePdf::new(TemplateSource::Bytes(template.into()))
    }

    /// Start from a reader, which is read to the end and dropped before returning
    pub fn from_reader<R: Read>(mut reader: R) -> Result<BuildablePdf> {
        let mut template = Vec::new();
        reader.read_to_end(&mut template)?;
        Ok(Self::from_bytes(template))
    }
}

/// Where the template comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl TemplateSource {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            TemplateSource::Bytes(bytes) => Ok(bytes),
            TemplateSource::Path(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound(path));
                }
                Ok(std::fs::read(&path)?)
            }
        }
    }
}

/// Long text spread over several single-line placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineRequest {
    pub text: String,
    pub max_chars_per_line: usize,
    pub fill_mode: FillMode,
    pub placeholders: Vec<String>,
}

impl MultiLineRequest {
    /// Distribute the text and pair every placeholder with its line
    pub fn resolve(&self) -> Result<Vec<(String, String)>> {
        require_at_least("number of placeholders", self.placeholders.len(), 2)?;
        for placeholder in &self.placeholders {
            validate_search_key(placeholder)?;
        }

        let lines = distribute(
            &self.text,
            self.max_chars_per_line,
            self.placeholders.len(),
            self.fill_mode,
        )?;

        Ok(self.placeholders.iter().cloned().zip(lines).collect())
    }
}

/// A document specification that can be built
pub struct BuildablePdf {
    template: TemplateSource,
    replacements: Vec<(String, String)>,
    multiline: Vec<MultiLineRequest>,
    assets: Vec<AssetSpec>,
    pdf_renderer: Box<dyn PdfRenderer>,
    qr_renderer: Box<dyn QrCodeRenderer>,
}

impl std::fmt::Debug for BuildablePdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildablePdf")
            .field("template", &self.template)
            .field("replacements", &self.replacements)
            .field("multiline", &self.multiline)
            .field("assets", &self.assets.len())
            .finish()
    }
}

impl BuildablePdf {
    fn new(template: TemplateSource) -> Self {
        Self {
            template,
            replacements: Vec::new(),
            multiline: Vec::new(),
            assets: Vec::new(),
            pdf_renderer: Box::new(LopdfRenderer),
            qr_renderer: Box::new(QrcodeRenderer),
        }
    }

    /// Use different rendering backends
    pub fn with_renderers(
        mut self,
        pdf_renderer: impl PdfRenderer + 'static,
        qr_renderer: impl QrCodeRenderer + 'static,
    ) -> Self {
        self.pdf_renderer = Box::new(pdf_renderer);
        self.qr_renderer = Box::new(qr_renderer);
        self
    }

    /// Replace every match of the `search` pattern with `replace`
    pub fn with_replacement(mut self, search: impl Into<String>, replace: impl Into<String>) -> Self {
        self.replacements.push((search.into(), replace.into()));
        self
    }

    /// Add several search-replace pairs
    pub fn with_replacements<I, K, V>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.replacements
            .extend(replacements.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Spread `text` over `placeholders`, at most `max_chars_per_line` characters each
    ///
    /// Lines fill from the first placeholder down, see
    /// [`with_multiline_replacement_mode`](Self::with_multiline_replacement_mode)
    /// for bottom alignment.
    pub fn with_multiline_replacement<I, S>(
        self,
        text: impl Into<String>,
        max_chars_per_line: usize,
        placeholders: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_multiline_replacement_mode(text, max_chars_per_line, FillMode::default(), placeholders)
    }

    /// Like [`with_multiline_replacement`](Self::with_multiline_replacement) with an explicit fill mode
    pub fn with_multiline_replacement_mode<I, S>(
        mut self,
        text: impl Into<String>,
        max_chars_per_line: usize,
        fill_mode: FillMode,
        placeholders: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.multiline.push(MultiLineRequest {
            text: text.into(),
            max_chars_per_line,
            fill_mode,
            placeholders: placeholders.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_qr_code(mut self, spec: QrSpec) -> Self {
        self.assets.push(AssetSpec::Qr(spec));
        self
    }

    pub fn with_image(mut self, spec: ImageSpec) -> Self {
        self.assets.push(AssetSpec::Image(spec));
        self
    }

    /// Check every argument and compile the final replacement set
    ///
    /// Multi-line placeholders are added after plain replacements and win
    /// over a plain replacement with the same key.
    pub fn validate(&self) -> Result<ReplacementSet> {
        let mut set = ReplacementSet::new();

        for (search, replace) in &self.replacements {
            validate_search_key(search)?;
            set.insert(search.as_str(), Some(replace.as_str()))?;
        }

        for request in &self.multiline {
            for (placeholder, line) in request.resolve()? {
                set.insert(placeholder, Some(line))?;
            }
        }

        Ok(set)
    }

    /// Render the document: load, replace text, stamp assets
    ///
    /// # Errors
    ///
    /// Validation errors for invalid arguments, render errors when the
    /// template, an asset or the output cannot be processed.
    pub fn build(self) -> Result<PdfDocument> {
        let replacements = self.validate()?;

        let template = self.template.into_bytes()?;
        let pdf = self.pdf_renderer.render_from_template(&template)?;
        let mut pdf = self
            .pdf_renderer
            .render_search_and_replace_text(&pdf, &replacements)?;

        if !self.assets.is_empty() {
            let qr_renderer = self.qr_renderer.as_ref();
            let assets = self
                .assets
                .into_iter()
                .map(|spec| spec.render(qr_renderer))
                .collect::<Result<Vec<RenderedAsset>>>()?;
            pdf = self.pdf_renderer.render_assets(&pdf, &assets)?;
        }

        log::info!("Built document of {} bytes", pdf.len());
        Ok(PdfDocument { data: pdf })
    }
}

/// A rendered PDF document
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    data: Vec<u8>,
}

impl PdfDocument {
    pub fn save(&self, target: impl AsRef<Path>) -> Result<()> {
        std::fs::write(target, &self.data)?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut output: W) -> Result<()> {
        output.write_all(&self.data)?;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
