//! Endpoint table and wire bodies for the conversion service

use serde::{Deserialize, Serialize};

pub const TEXT_TO_CODE_PATH: &str = "/api/text-to-code";
pub const SCREENSHOT_TO_CODE_PATH: &str = "/api/screenshot-to-code";
pub const FIGMA_TO_CODE_PATH: &str = "/api/figma-to-code";

/// Multipart field carrying the screenshot
pub const IMAGE_FIELD: &str = "image";

impl crate::ConversionKind
{   /// Endpoint path serving this kind
    pub fn endpoint(&self) -> &'static str
    {   match self
        {   crate::ConversionKind::Text => TEXT_TO_CODE_PATH
          , crate::ConversionKind::Screenshot => {
              SCREENSHOT_TO_CODE_PATH
            }
          , crate::ConversionKind::Figma => FIGMA_TO_CODE_PATH
        }
    }
}

/// Body of `POST /api/text-to-code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToCodeBody
{   pub text: String
}

/// Body of `POST /api/figma-to-code`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigmaToCodeBody
{   pub url: String
}

/// What the transport puts on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody
{   /// JSON document
    Json(serde_json::Value)
  , /// multipart/form-data with a single file part
    Multipart
    {   field: &'static str
      , data: Vec<u8>
      , filename: String
      , mime: String
    }
}

/// Pick the endpoint and encode the body for a request.
/// Fails with `UnknownConversionType` when kind and payload disagree.
pub fn encode(
  request: &crate::ConversionRequest
) -> Result<(&'static str, RequestBody), crate::error::Error>
{   use crate::{ConversionKind, ConversionPayload};

    let body = match (request.kind, &request.payload)
    {   (ConversionKind::Text, ConversionPayload::Text(text)) => {
          RequestBody::Json(serde_json::to_value(TextToCodeBody
          {   text: text.clone()
          }).map_err(|e| {
            crate::error::Error::Other(e.to_string())
          })?)
        }
      , ( ConversionKind::Screenshot
        , ConversionPayload::Screenshot { data, filename, mime }
        ) => {
          RequestBody::Multipart
          {   field: IMAGE_FIELD
            , data: data.clone()
            , filename: filename.clone()
            , mime: mime.clone()
          }
        }
      , (ConversionKind::Figma, ConversionPayload::Figma(url)) => {
          RequestBody::Json(serde_json::to_value(FigmaToCodeBody
          {   url: url.clone()
          }).map_err(|e| {
            crate::error::Error::Other(e.to_string())
          })?)
        }
      , _ => return Err(crate::error::Error::UnknownConversionType)
    };

    Ok((request.kind.endpoint(), body))
}

/// Non-empty string field of a JSON object, if any
fn text_field<'a>(
  body: &'a serde_json::Value
, name: &str
) -> Option<&'a str>
{   body.get(name)
      .and_then(serde_json::Value::as_str)
      .filter(|s| !s.is_empty())
}

/// Turn a raw reply into generated code or the error to show.
///
/// 2xx: non-empty string `code` wins, then non-empty string `error`,
/// else `UnexpectedResponse`; only a body that is not JSON at all is
/// a `ParseError`. Other statuses: the server's `error` text if
/// present, else `HTTP error! status: N`.
pub fn interpret(
  reply: &crate::transport::HttpReply
) -> Result<String, crate::error::Error>
{   let parsed: Result<serde_json::Value, _>
      = serde_json::from_str(&reply.body);

    if !reply.is_success()
    {   let server_error = parsed.ok().and_then(|b| {
          if let Some(details) = text_field(&b, "details")
          {   log::debug!("Server error details: {}", details);
          }
          text_field(&b, "error").map(str::to_string)
        });
        return Err(crate::error::Error::ApiError(
          server_error.unwrap_or_else(|| {
            format!("HTTP error! status: {}", reply.status)
          })
        ));
    }

    let body = parsed.map_err(|e| {
      crate::error::Error::ParseError(e.to_string())
    })?;

    if let Some(code) = text_field(&body, "code")
    {   return Ok(code.to_string());
    }
    match text_field(&body, "error")
    {   Some(error) => {
          Err(crate::error::Error::ApiError(error.to_string()))
        }
      , None => Err(crate::error::Error::UnexpectedResponse)
    }
}
