//! Image conversion service.
//!
//! Decodes an upload, forces three-channel RGB (dropping alpha and any
//! colour-profile metadata), re-encodes to the requested format, and writes
//! the result under a freshly generated UUID filename in the artifact
//! directory. PDF output wraps a JPEG encoding of the image in a one-page
//! document.
//!
//! Artifacts are retained for a configurable window; files older than the
//! window are swept before each new conversion writes its output, so no
//! background task is needed.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use image::{DynamicImage, ImageFormat};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::Error;
use super::format::OutputFormat;

/// One converted file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Full path of the written file.
    pub path: PathBuf,
    /// Generated `<uuid>.<ext>` name, used for the download filename.
    pub file_name: String,
    /// MIME type of the encoded content.
    pub media_type: &'static str,
}

/// Conversion failures.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The upload is not a decodable image.
    #[error("could not decode uploaded image: {message}")]
    Decode { message: String },
    /// Re-encoding to the target format failed.
    #[error("could not encode image: {message}")]
    Encode { message: String },
    /// Writing the artifact failed.
    #[error("could not write artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConversionError> for Error {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Decode { .. } => Self::decode_failure(err.to_string()),
            ConversionError::Encode { .. } | ConversionError::Io(_) => {
                Self::internal(err.to_string())
            }
        }
    }
}

/// Converts uploads and manages the artifact directory.
#[derive(Debug, Clone)]
pub struct ConversionService {
    artifact_dir: PathBuf,
    retention: Duration,
}

impl ConversionService {
    /// Create a service writing artifacts under `artifact_dir`, keeping
    /// them for `retention` before they become eligible for the sweep.
    ///
    /// # Errors
    ///
    /// Fails if the artifact directory cannot be created.
    pub fn new(artifact_dir: impl Into<PathBuf>, retention: Duration) -> std::io::Result<Self> {
        let artifact_dir = artifact_dir.into();
        fs::create_dir_all(&artifact_dir)?;
        Ok(Self {
            artifact_dir,
            retention,
        })
    }

    /// Convert `bytes` to `format` and persist the result.
    ///
    /// Synchronous and CPU-bound; HTTP handlers run it on a blocking
    /// thread.
    ///
    /// # Errors
    ///
    /// [`ConversionError::Decode`] for undecodable input,
    /// [`ConversionError::Encode`] or [`ConversionError::Io`] when the
    /// encoder or the filesystem fails.
    pub fn convert(
        &self,
        bytes: &[u8],
        format: OutputFormat,
    ) -> Result<Artifact, ConversionError> {
        self.sweep_expired();

        let decoded = image::load_from_memory(bytes).map_err(|err| ConversionError::Decode {
            message: err.to_string(),
        })?;
        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

        let encoded = match format.image_format() {
            Some(image_format) => encode(&rgb, image_format)?,
            None => {
                let jpeg = encode(&rgb, ImageFormat::Jpeg)?;
                pdf_page(&jpeg, rgb.width(), rgb.height())
            }
        };

        let file_name = format!("{}.{}", Uuid::new_v4(), format.extension());
        let path = self.artifact_dir.join(&file_name);
        fs::write(&path, &encoded)?;
        debug!(file = %file_name, bytes = encoded.len(), "artifact written");

        Ok(Artifact {
            path,
            file_name,
            media_type: format.media_type(),
        })
    }

    /// Delete artifacts older than the retention window. Best effort:
    /// filesystem errors are logged and ignored.
    fn sweep_expired(&self) {
        let cutoff = SystemTime::now()
            .checked_sub(self.retention)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let entries = match fs::read_dir(&self.artifact_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "artifact sweep could not read directory");
                return;
            }
        };
        for entry in entries.flatten() {
            let expired = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .is_ok_and(|modified| modified < cutoff);
            if expired {
                if let Err(err) = fs::remove_file(entry.path()) {
                    warn!(path = %entry.path().display(), error = %err, "artifact sweep failed");
                }
            }
        }
    }
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ConversionError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .map_err(|err| ConversionError::Encode {
            message: err.to_string(),
        })?;
    Ok(buf.into_inner())
}

/// Compose a single-page PDF embedding `jpeg` as a full-page DCTDecode
/// image XObject. Page size matches the pixel dimensions (1 px = 1 pt).
fn pdf_page(jpeg: &[u8], width: u32, height: u32) -> Vec<u8> {
    use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Im1");

    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (width as f32, height as f32);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, w, h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, jpeg);
    image.filter(Filter::DctDecode);
    #[allow(clippy::cast_possible_wrap)]
    {
        image.width(width as i32);
        image.height(height as i32);
    }
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([w, 0.0, 0.0, h, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.finish()
}
