use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use log::{debug, error, info};

/// State machine for one conversion attempt at a time.
///
/// `Idle --submit--> Pending --resolve--> Resolved --submit--> Pending`
///
/// Every transition is published on a watch channel so presenters can
/// follow along without holding the controller.
///
/// The in-flight flag is set while `Pending` and cleared before
/// `Resolved` is published, so anyone who has seen `Resolved` may
/// submit again.
pub struct ConversionController<T>
{   transport: T
  , state_tx: watch::Sender<crate::ConversionState>
  , in_flight: Arc<AtomicBool>
}

impl<T> ConversionController<T>
where T: crate::transport::ConversionTransport
{   pub fn new(transport: T) -> Self
    {   debug!("Creating ConversionController");
        let (state_tx, _) = watch::channel(
          crate::ConversionState::Idle
        );
        ConversionController
        {   transport
          , state_tx
          , in_flight: Arc::new(AtomicBool::new(false))
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> crate::ConversionState
    {   self.state_tx.borrow().clone()
    }

    /// Read-only view for presenters
    pub fn subscribe(&self) -> watch::Receiver<crate::ConversionState>
    {   self.state_tx.subscribe()
    }

    /// Flag shared with whoever guards submissions
    pub fn in_flight(&self) -> Arc<AtomicBool>
    {   self.in_flight.clone()
    }

    /// Run one request to its outcome. Never fails: every error is
    /// logged and returned as `Failure`.
    pub async fn submit(
      &mut self
    , request: crate::ConversionRequest
    ) -> crate::ConversionOutcome
    {   debug!("submit {:?}", request.kind);
        self.in_flight.store(true, Ordering::Release);
        self.publish(crate::ConversionState::Pending);

        let outcome = match self.dispatch(&request).await
        {   Ok(code) => {
              info!(
                "{:?} conversion produced {} bytes of code",
                request.kind, code.len()
              );
              crate::ConversionOutcome::Success
              {   code
              }
            }
          , Err(e) => {
              error!("{:?} conversion failed: {:?}", request.kind, e);
              crate::ConversionOutcome::from(e)
            }
        };

        self.in_flight.store(false, Ordering::Release);
        self.publish(crate::ConversionState::Resolved(outcome.clone()));
        outcome
    }

    async fn dispatch(
      &self
    , request: &crate::ConversionRequest
    ) -> Result<String, crate::error::Error>
    {   let (path, body) = crate::request::encode(request)?;
        let reply = self.transport.post(path, body).await?;
        debug!("{} answered {}", path, reply.status);
        crate::request::interpret(&reply)
    }

    fn publish(&self, state: crate::ConversionState)
    {   debug!("Phase -> {:?}", state.phase());
        self.state_tx.send_replace(state);
    }
}
