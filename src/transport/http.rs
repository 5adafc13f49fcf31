use std::time::Duration;
use log::{debug, trace, error};

/// reqwest-backed transport talking to the real service
#[derive(Debug, Clone)]
pub struct HttpTransport
{   config: crate::config::ConverterConfig
  , http_client: reqwest::Client
}

impl HttpTransport
{   /// Build a transport from a validated configuration
    pub fn new(
      config: crate::config::ConverterConfig
    ) -> Result<Self, crate::error::Error>
    {   config.validate()?;
        debug!("Creating HttpTransport for {}", config.api_base);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::InvalidConfiguration(e.to_string())
        })?;

        Ok(HttpTransport
        {   config
          , http_client
        })
    }

    pub fn config(&self) -> &crate::config::ConverterConfig
    {   &self.config
    }

    fn map_send_error(e: reqwest::Error) -> crate::error::Error
    {   if e.is_timeout()
        {   error!("Request timed out: {}", e);
            crate::error::Error::Timeout
        } else
        {   error!("HTTP error: {}", e);
            crate::error::Error::HttpError(e.to_string())
        }
    }
}

impl super::ConversionTransport for HttpTransport
{   async fn post(
      &self
    , path: &'static str
    , body: crate::request::RequestBody
    ) -> Result<super::HttpReply, crate::error::Error>
    {   let url = self.config.endpoint_url(path);
        debug!("POST {}", url);

        let request = self.http_client.post(&url);
        // multipart sets its own content type and boundary
        let request = match body
        {   crate::request::RequestBody::Json(value) => {
              trace!("JSON body: {}", value);
              request.json(&value)
            }
          , crate::request::RequestBody::Multipart
            {   field, data, filename, mime
            } => {
              trace!(
                "Multipart body: {} ({}, {} bytes)",
                filename, mime, data.len()
              );
              let part = reqwest::multipart::Part::bytes(data)
                .file_name(filename)
                .mime_str(&mime)
                .map_err(|e| {
                  error!("Bad MIME type {}: {}", mime, e);
                  crate::error::Error::Other(e.to_string())
                })?;
              request.multipart(
                reqwest::multipart::Form::new().part(field, part)
              )
            }
        };

        let response = request
          .send()
          .await
          .map_err(Self::map_send_error)?;

        let status = response.status().as_u16();
        trace!("Response status: {}", status);

        let body = response.text().await
          .map_err(Self::map_send_error)?;
        trace!("Response body: {}", body);

        Ok(super::HttpReply
        {   status
          , body
        })
    }
}
