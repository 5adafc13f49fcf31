use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, watch};
use log::{debug, error, info};
use crate::ConverterFoot;

/// Public API for the conversion backend - owns the task
pub struct ConverterBackend
{   hand: crate::ConverterHand
  , in_flight: Arc<AtomicBool>
  , state_rx: watch::Receiver<crate::ConversionState>
  , _task_handle: tokio::task::JoinHandle<()>
}

impl ConverterBackend
{   /// Create and spawn a backend talking HTTP to `config.api_base`
    pub fn new(
      config: crate::config::ConverterConfig
    ) -> Result<Self, crate::error::Error>
    {   let transport = crate::transport::HttpTransport::new(config)?;
        Ok(Self::with_transport(transport))
    }

    /// Create and spawn a backend over any transport
    /// Returns immediately - spawns background task
    pub fn with_transport<T>(transport: T) -> Self
    where T: crate::transport::ConversionTransport
    {   debug!("Creating ConverterBackend with task ownership");

        let (submit_tx, submit_rx)
          = mpsc::unbounded_channel();
        let (kill_process_tx, kill_process_rx)
          = mpsc::unbounded_channel();

        let hand = crate::ConverterHand
        {   submit_tx
          , kill_process_tx
        };

        let foot = crate::ConverterFoot
        {   submit_rx
          , kill_process_rx
        };

        let controller
          = crate::controller::ConversionController::new(transport);
        let state_rx = controller.subscribe();
        let in_flight = controller.in_flight();

        let _task_handle = tokio::spawn(async move {
          run_backend_loop(foot, controller).await
        });

        ConverterBackend
        {   hand
          , in_flight
          , state_rx
          , _task_handle
        }
    }

    /// Submit a request - returns almost immediately.
    /// Refused with `Busy` while an earlier request is unresolved.
    pub fn submit(
      &self
    , request: crate::ConversionRequest
    ) -> Result<
        mpsc::UnboundedReceiver<crate::SubmitReply>,
        crate::error::Error
      >
    {   if self.in_flight
          .compare_exchange(
            false, true, Ordering::AcqRel, Ordering::Acquire
          )
          .is_err()
        {   debug!("submit refused, conversion in flight");
            return Err(crate::error::Error::Busy);
        }

        debug!("submit queuing {:?} request", request.kind);
        let (reply_tx, reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::SubmitArgs
        {   request
          , reply: reply_tx
        };

        self.hand.submit_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel closed");
            self.in_flight.store(false, Ordering::Release);
            crate::error::Error::Other(
              "Backend disconnected".to_string()
            )
          })?;

        Ok(reply_rx)
    }

    /// True while a submitted request has not resolved
    pub fn is_busy(&self) -> bool
    {   self.in_flight.load(Ordering::Acquire)
    }

    /// Watch the controller state
    pub fn state(&self) -> watch::Receiver<crate::ConversionState>
    {   self.state_rx.clone()
    }

    /// Gracefully shutdown the backend
    pub async fn shutdown(self)
      -> Result<(), crate::error::Error>
    {   debug!("Shutting down ConverterBackend");
        let (reply_tx, mut reply_rx)
          = mpsc::unbounded_channel();

        let cmd = crate::KillProcessArgs
        {   reply: reply_tx
        };

        self.hand.kill_process_tx
          .send(cmd)
          .map_err(|_| {
            error!("Backend channel already closed");
            crate::error::Error::Other(
              "Backend already shutdown".to_string()
            )
          })?;

        // Wait for shutdown confirmation
        if let Some(result) = reply_rx.recv().await
        {   debug!("Backend shutdown confirmed");
            result
        } else
        {   error!("Backend shutdown timeout");
            Err(crate::error::Error::Timeout)
        }
    }
}

/// Main backend event loop
///
/// One submit is awaited to completion before the next command is
/// read; the controller's in-flight flag keeps a second submit from
/// queueing.
async fn run_backend_loop<T>(
  foot: crate::ConverterFoot
, mut controller: crate::controller::ConversionController<T>
)
where T: crate::transport::ConversionTransport
{   debug!("Starting ConverterBackend event loop");
    let ConverterFoot
    {   mut submit_rx
      , mut kill_process_rx
    } = foot;

    loop
    { tokio::select!
      { Some(cmd) = submit_rx.recv() => {
          debug!("Received Submit for {:?}", cmd.request.kind);
          let outcome = controller.submit(cmd.request).await;
          let _ = cmd.reply.send(outcome);
        }
      , Some(cmd) = kill_process_rx.recv() => {
          debug!("Received KillProcess");
          let _ = cmd.reply.send(Ok(()));
          info!("ConverterBackend shutting down");
          break;
        }
      , else => {
          debug!("All command channels closed");
          break;
        }
      }
    }
}
