//! Output format resolution.
//!
//! Maps a user-supplied format token to a concrete encoder. Tokens are
//! case-insensitive and default to `jpg` when omitted; anything outside the
//! supported set is rejected with a message echoing the offending token.

use image::ImageFormat;

use super::error::Error;

/// Supported conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Pdf,
    Tiff,
}

impl OutputFormat {
    /// Resolve a format token. `None` falls back to JPEG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::unsupported_format`] echoing the token verbatim
    /// when it names no supported encoder.
    pub fn resolve(token: Option<&str>) -> Result<Self, Error> {
        let Some(token) = token else {
            return Ok(Self::Jpeg);
        };
        match token.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "pdf" => Ok(Self::Pdf),
            "tiff" => Ok(Self::Tiff),
            _ => Err(Error::unsupported_format(token)),
        }
    }

    /// File extension for artifacts of this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Pdf => "pdf",
            Self::Tiff => "tiff",
        }
    }

    /// MIME type served with the download.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Pdf => "application/pdf",
            Self::Tiff => "image/tiff",
        }
    }

    /// The `image` crate encoder backing this format, if one exists.
    ///
    /// PDF returns `None`; it is composed from a JPEG encoding instead.
    #[must_use]
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Jpeg => Some(ImageFormat::Jpeg),
            Self::Png => Some(ImageFormat::Png),
            Self::Webp => Some(ImageFormat::WebP),
            Self::Tiff => Some(ImageFormat::Tiff),
            Self::Pdf => None,
        }
    }
}
