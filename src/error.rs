use std::fmt;

/// Custom error type for codeconv operations
/// Implements Clone for sending through channels
///
/// `Display` yields the text shown to the user; detail strings
/// carried by transport and parse errors are for the log only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Input rejected before any request was built
    Validation(String)
  , /// Network unreachable, DNS failure, connection refused
    HttpError(String)
  , /// Request timed out
    Timeout
  , /// Server answered with an error message
    ApiError(String)
  , /// Response body could not be parsed
    ParseError(String)
  , /// 2xx response with neither `code` nor `error`
    UnexpectedResponse
  , /// Request kind does not match its payload
    UnknownConversionType
  , /// A conversion is already in flight
    Busy
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Local file access failed
    Io(String)
  , /// Generic error
    Other(String)
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Validation(msg) => {
              write!(f, "{}", msg)
            }
          , Error::HttpError(_) => {
              write!(f,
                "Network error: could not reach the conversion service"
              )
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ApiError(msg) => {
              write!(f, "{}", msg)
            }
          , Error::ParseError(_) => {
              write!(f, "Malformed response from server")
            }
          , Error::UnexpectedResponse => {
              write!(f, "Unexpected response from server")
            }
          , Error::UnknownConversionType => {
              write!(f, "Unknown conversion type")
            }
          , Error::Busy => {
              write!(f, "A conversion is already in progress")
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Io(msg) => {
              write!(f, "I/O error: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Io(e.to_string())
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}
