pub mod error;
pub mod config;
pub mod transport;
pub mod request;
pub mod input;
pub mod controller;
pub mod presenter;
pub mod client;

/*

codeconv turns a UI design (a text description, a screenshot, or a
Figma link) into source code by asking a remote conversion service.
the library owns the lifecycle of one conversion attempt; the service
itself is a black box reached over three HTTP endpoints.

codeconv/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports, lifecycle types, actor messages
│   ├── error.rs        # Error enum shared by every layer
│   ├── config.rs       # Base URL, timeout, env and file loading
│   ├── request.rs      # Endpoint table and wire bodies
│   ├── transport/      # The network seam
│   │   ├── mod.rs      # ConversionTransport trait
│   │   └── http.rs     # reqwest implementation
│   ├── input.rs        # InputCollector: validation before submit
│   ├── controller.rs   # ConversionController state machine
│   ├── presenter.rs    # Loading / error / code views
│   ├── client.rs       # ConverterBackend actor
│   └── main.rs         # CLI front end
└── tests/

*/

/// CODECONV API INTERFACE:

// ===== Submit =====

pub type SubmitReply = ConversionOutcome;
pub type SubmitReplySender
  = tokio::sync::mpsc::UnboundedSender<SubmitReply>;

pub struct SubmitArgs
{   pub request: ConversionRequest
  , pub reply: SubmitReplySender
}

// ===== KillProcess =====

pub type KillProcessReply = Result<(), crate::error::Error>;
pub type KillProcessReplySender
  = tokio::sync::mpsc::UnboundedSender<KillProcessReply>;

pub struct KillProcessArgs
{   pub reply: KillProcessReplySender
}

// ===== ConverterHand (sender side) =====

pub struct ConverterHand
{   pub submit_tx
      : tokio::sync::mpsc::UnboundedSender<SubmitArgs>
  , pub kill_process_tx
      : tokio::sync::mpsc::UnboundedSender<KillProcessArgs>
}

// ===== ConverterFoot (receiver side) =====

pub struct ConverterFoot
{   pub submit_rx
      : tokio::sync::mpsc::UnboundedReceiver<SubmitArgs>
  , pub kill_process_rx
      : tokio::sync::mpsc::UnboundedReceiver<KillProcessArgs>
}

/// CODECONV STRUCTURES:

/// The three ways a design can be handed to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind
{   /// Natural language description of the UI
    Text
  , /// Image of an existing UI
    Screenshot
  , /// Link to a Figma design file
    Figma
}

/// Input carried by a request. Shape follows the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionPayload
{   Text(String)
  , Screenshot
    {   data: Vec<u8>
      , filename: String
      , mime: String
    }
  , Figma(String)
}

impl ConversionPayload
{   /// Kind matching this payload's shape
    pub fn kind(&self) -> ConversionKind
    {   match self
        {   ConversionPayload::Text(_) => ConversionKind::Text
          , ConversionPayload::Screenshot { .. } => {
              ConversionKind::Screenshot
            }
          , ConversionPayload::Figma(_) => ConversionKind::Figma
        }
    }
}

/// One user-triggered conversion.
///
/// Build requests through [`input::InputCollector`], which refuses
/// empty input. A request whose `kind` disagrees with its `payload`
/// resolves to "Unknown conversion type" without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest
{   pub kind: ConversionKind
  , pub payload: ConversionPayload
}

impl ConversionRequest
{   pub fn new(payload: ConversionPayload) -> Self
    {   ConversionRequest
        {   kind: payload.kind()
          , payload
        }
    }
}

/// Terminal result of a conversion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome
{   Success
    {   code: String
    }
  , Failure
    {   message: String
    }
}

impl ConversionOutcome
{   pub fn is_success(&self) -> bool
    {   matches!(self, ConversionOutcome::Success { .. })
    }
}

impl From<crate::error::Error> for ConversionOutcome
{   fn from(e: crate::error::Error) -> Self
    {   ConversionOutcome::Failure
        {   message: e.to_string()
        }
    }
}

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase
{   Idle
  , Pending
  , Resolved
}

/// Controller state; an outcome exists only once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConversionState
{   #[default]
    Idle
  , Pending
  , Resolved(ConversionOutcome)
}

impl ConversionState
{   pub fn phase(&self) -> Phase
    {   match self
        {   ConversionState::Idle => Phase::Idle
          , ConversionState::Pending => Phase::Pending
          , ConversionState::Resolved(_) => Phase::Resolved
        }
    }

    pub fn outcome(&self) -> Option<&ConversionOutcome>
    {   match self
        {   ConversionState::Resolved(outcome) => Some(outcome)
          , _ => None
        }
    }
}

pub use client::ConverterBackend;
pub use config::ConverterConfig;
pub use controller::ConversionController;
pub use input::InputCollector;
pub use presenter::View;
pub use transport::{ConversionTransport, HttpReply, HttpTransport};
