//! Network seam between the controller and the conversion service

pub mod http;

use std::future::Future;

// Re-export for convenience
pub use http::HttpTransport;

/// Status and raw body of a service reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply
{   pub status: u16
  , pub body: String
}

impl HttpReply
{   pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}

/// One POST to the conversion service.
///
/// Implementations report what the server said, whatever the status;
/// `Err` is reserved for failures to get an answer at all.
pub trait ConversionTransport: Send + Sync + 'static
{   fn post(
      &self
    , path: &'static str
    , body: crate::request::RequestBody
    ) -> impl Future<Output = Result<HttpReply, crate::error::Error>>
      + Send;
}
