//! Views projected from controller state

use std::fmt;
use std::io::Write;

/// What the user sees for a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View
{   /// Nothing submitted yet
    Blank
  , /// Request in flight
    Loading
  , /// Attempt failed
    Error(String)
  , /// Generated code, ready to copy
    Code(String)
}

impl View
{   pub fn from_state(state: &crate::ConversionState) -> Self
    {   match state
        {   crate::ConversionState::Idle => View::Blank
          , crate::ConversionState::Pending => View::Loading
          , crate::ConversionState::Resolved(
              crate::ConversionOutcome::Failure { message }
            ) => View::Error(message.clone())
          , crate::ConversionState::Resolved(
              crate::ConversionOutcome::Success { code }
            ) => View::Code(code.clone())
        }
    }

    /// Copy the generated code into `sink`. Returns false when there
    /// is no code to copy.
    pub fn copy_code<W: Write>(
      &self
    , sink: &mut W
    ) -> std::io::Result<bool>
    {   match self
        {   View::Code(code) => {
              sink.write_all(code.as_bytes())?;
              sink.flush()?;
              Ok(true)
            }
          , _ => Ok(false)
        }
    }
}

impl fmt::Display for View
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   View::Blank => Ok(())
          , View::Loading => write!(f, "Loading... Please wait.")
          , View::Error(message) => {
              write!(f, "Error!\n{}", message)
            }
          , View::Code(code) => {
              write!(f, "Generated Code\n{}", code)
            }
        }
    }
}
