//! Input collection and pre-flight validation
//!
//! Nothing here touches the network: an empty field is refused
//! locally and no request is ever built for it.

use std::path::Path;
use log::{debug, error};

pub const EMPTY_TEXT_MESSAGE: &str
  = "Please enter some text for text-to-code conversion.";
pub const NO_FILE_MESSAGE: &str
  = "Please select a screenshot file.";
pub const EMPTY_URL_MESSAGE: &str
  = "Please enter a Figma URL.";

/// Builds validated [`crate::ConversionRequest`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct InputCollector;

impl InputCollector
{   /// Text description; blank input is refused.
    /// The text is sent as typed, surrounding whitespace included.
    pub fn text(
      input: &str
    ) -> Result<crate::ConversionRequest, crate::error::Error>
    {   if input.trim().is_empty()
        {   debug!("Rejecting empty text input");
            return Err(crate::error::Error::Validation(
              EMPTY_TEXT_MESSAGE.to_string()
            ));
        }
        Ok(crate::ConversionRequest::new(
          crate::ConversionPayload::Text(input.to_string())
        ))
    }

    /// Screenshot already in memory; only image files are accepted
    pub fn screenshot(
      data: Vec<u8>
    , filename: &str
    ) -> Result<crate::ConversionRequest, crate::error::Error>
    {   if data.is_empty() || filename.trim().is_empty()
        {   debug!("Rejecting screenshot without content");
            return Err(crate::error::Error::Validation(
              NO_FILE_MESSAGE.to_string()
            ));
        }
        let mime = mime_for(filename).ok_or_else(|| {
          debug!("Rejecting non-image screenshot: {}", filename);
          crate::error::Error::Validation(NO_FILE_MESSAGE.to_string())
        })?;
        Ok(crate::ConversionRequest::new(
          crate::ConversionPayload::Screenshot
          {   mime: mime.to_string()
            , filename: filename.to_string()
            , data
          }
        ))
    }

    /// Screenshot read from disk. A path that does not exist counts
    /// as no file selected.
    pub async fn screenshot_file(
      path: impl AsRef<Path>
    ) -> Result<crate::ConversionRequest, crate::error::Error>
    {   let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false)
        {   debug!("Screenshot not found: {}", path.display());
            return Err(crate::error::Error::Validation(
              NO_FILE_MESSAGE.to_string()
            ));
        }

        let data = tokio::fs::read(path).await.map_err(|e| {
          error!("Failed to read {}: {}", path.display(), e);
          crate::error::Error::from(e)
        })?;
        let filename = path.file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .unwrap_or_default();

        debug!("Read screenshot {} ({} bytes)", filename, data.len());
        Self::screenshot(data, &filename)
    }

    /// Figma design link; blank input is refused.
    pub fn figma(
      url: &str
    ) -> Result<crate::ConversionRequest, crate::error::Error>
    {   let url = url.trim();
        if url.is_empty()
        {   debug!("Rejecting empty Figma URL");
            return Err(crate::error::Error::Validation(
              EMPTY_URL_MESSAGE.to_string()
            ));
        }
        Ok(crate::ConversionRequest::new(
          crate::ConversionPayload::Figma(url.to_string())
        ))
    }
}

/// Image MIME type from the file extension; `None` if not an image
pub fn mime_for(filename: &str) -> Option<&'static str>
{   let ext = Path::new(filename)
      .extension()
      .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref()
    {   Some("png") => Some("image/png")
      , Some("jpg") | Some("jpeg") => Some("image/jpeg")
      , Some("gif") => Some("image/gif")
      , Some("webp") => Some("image/webp")
      , Some("bmp") => Some("image/bmp")
      , Some("svg") => Some("image/svg+xml")
      , _ => None
    }
}
