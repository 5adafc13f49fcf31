use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{watch, Notify};
use tokio_test::{assert_err, assert_ok};

use codeconv::error::Error;
use codeconv::request::RequestBody;
use codeconv::{
  ConversionController, ConversionKind, ConversionOutcome
, ConversionPayload, ConversionRequest, ConversionState
, ConversionTransport, ConverterBackend, HttpReply, InputCollector
, Phase, View
};

/// Transport double: answers every call the same way and records
/// what it was asked and what phase the controller was in.
#[derive(Clone)]
struct MockTransport
{   reply: Result<HttpReply, Error>
  , calls: Arc<AtomicUsize>
  , requests: Arc<Mutex<Vec<(&'static str, RequestBody)>>>
  , observer: Arc<Mutex<Option<watch::Receiver<ConversionState>>>>
  , phases_seen: Arc<Mutex<Vec<Phase>>>
  , gate: Option<Arc<Notify>>
}

impl MockTransport
{   fn replying(status: u16, body: &str) -> Self
    {   Self::with_result(Ok(HttpReply
        {   status
          , body: body.to_string()
        }))
    }

    fn failing(error: Error) -> Self
    {   Self::with_result(Err(error))
    }

    fn with_result(reply: Result<HttpReply, Error>) -> Self
    {   MockTransport
        {   reply
          , calls: Arc::new(AtomicUsize::new(0))
          , requests: Arc::new(Mutex::new(vec![]))
          , observer: Arc::new(Mutex::new(None))
          , phases_seen: Arc::new(Mutex::new(vec![]))
          , gate: None
        }
    }

    /// Hold every call until the gate is notified
    fn gated(mut self, gate: Arc<Notify>) -> Self
    {   self.gate = Some(gate);
        self
    }

    fn observe(&self, rx: watch::Receiver<ConversionState>)
    {   *self.observer.lock().unwrap() = Some(rx);
    }

    fn call_count(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }

    fn phases_seen(&self) -> Vec<Phase>
    {   self.phases_seen.lock().unwrap().clone()
    }

    fn requests(&self) -> Vec<(&'static str, RequestBody)>
    {   self.requests.lock().unwrap().clone()
    }
}

impl ConversionTransport for MockTransport
{   async fn post(
      &self
    , path: &'static str
    , body: RequestBody
    ) -> Result<HttpReply, Error>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((path, body));
        let phase = self.observer.lock().unwrap()
          .as_ref()
          .map(|rx| rx.borrow().phase());
        if let Some(phase) = phase
        {   self.phases_seen.lock().unwrap().push(phase);
        }

        if let Some(gate) = &self.gate
        {   gate.notified().await;
        }
        self.reply.clone()
    }
}

fn text_request() -> ConversionRequest
{   assert_ok!(InputCollector::text("A blue button with white text"))
}

fn all_kind_requests() -> Vec<ConversionRequest>
{   vec![
      text_request()
    , assert_ok!(InputCollector::screenshot(
        vec![0x89, 0x50, 0x4e, 0x47],
        "login.png"
      ))
    , assert_ok!(InputCollector::figma(
        "https://www.figma.com/file/abc123/Landing"
      ))
    ]
}

fn success(code: &str) -> ConversionOutcome
{   ConversionOutcome::Success
    {   code: code.to_string()
    }
}

fn failure(message: &str) -> ConversionOutcome
{   ConversionOutcome::Failure
    {   message: message.to_string()
    }
}

// ===== ConversionController =====

#[tokio::test]
async fn test_every_kind_passes_through_pending_once()
{   for request in all_kind_requests()
    {   let kind = request.kind;
        let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
        let mut controller = ConversionController::new(mock.clone());
        mock.observe(controller.subscribe());

        assert_eq!(controller.state().phase(), Phase::Idle);
        let outcome = controller.submit(request).await;

        assert_eq!(outcome, success("X"), "kind {:?}", kind);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.phases_seen(), vec![Phase::Pending]);
        assert_eq!(
          controller.state(),
          ConversionState::Resolved(success("X"))
        );
    }
}

#[tokio::test]
async fn test_each_kind_hits_its_endpoint()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let mut controller = ConversionController::new(mock.clone());
    for request in all_kind_requests()
    {   controller.submit(request).await;
    }

    let paths: Vec<&str> = mock.requests()
      .iter()
      .map(|(path, _)| *path)
      .collect();
    assert_eq!(paths, vec![
      "/api/text-to-code",
      "/api/screenshot-to-code",
      "/api/figma-to-code",
    ]);
}

#[tokio::test]
async fn test_request_bodies()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let mut controller = ConversionController::new(mock.clone());
    for request in all_kind_requests()
    {   controller.submit(request).await;
    }

    let requests = mock.requests();
    assert_eq!(
      requests[0].1,
      RequestBody::Json(serde_json::json!({
        "text": "A blue button with white text"
      }))
    );
    assert_eq!(
      requests[1].1,
      RequestBody::Multipart
      {   field: "image"
        , data: vec![0x89, 0x50, 0x4e, 0x47]
        , filename: "login.png".to_string()
        , mime: "image/png".to_string()
      }
    );
    assert_eq!(
      requests[2].1,
      RequestBody::Json(serde_json::json!({
        "url": "https://www.figma.com/file/abc123/Landing"
      }))
    );
}

#[tokio::test]
async fn test_server_error_message_passes_through()
{   let mock = MockTransport::replying(400, r#"{"error":"bad input"}"#);
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, failure("bad input"));
    assert_eq!(controller.state().outcome(), Some(&outcome));
}

#[tokio::test]
async fn test_error_status_without_body_uses_status_code()
{   let mock = MockTransport::replying(500, "");
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, failure("HTTP error! status: 500"));
}

#[tokio::test]
async fn test_error_field_in_success_response()
{   let mock = MockTransport::replying(
      200,
      r#"{"error":"Could not read the design"}"#
    );
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, failure("Could not read the design"));
}

#[tokio::test]
async fn test_empty_success_body_is_unexpected()
{   let mock = MockTransport::replying(200, "{}");
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, failure("Unexpected response from server"));
}

#[tokio::test]
async fn test_code_takes_precedence_over_error()
{   let mock = MockTransport::replying(
      200,
      r#"{"code":"<button/>","error":"partial"}"#
    );
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, success("<button/>"));
}

#[tokio::test]
async fn test_transport_failure_becomes_failure()
{   let mock = MockTransport::failing(
      Error::HttpError("connection refused".to_string())
    );
    let mut controller = ConversionController::new(mock);

    match controller.submit(text_request()).await
    {   ConversionOutcome::Failure { message } => {
          assert!(!message.is_empty());
          assert!(!message.contains("connection refused"));
        }
      , other => panic!("expected failure, got {:?}", other)
    }
    assert_eq!(controller.state().phase(), Phase::Resolved);
}

#[tokio::test]
async fn test_timeout_becomes_failure()
{   let mock = MockTransport::failing(Error::Timeout);
    let mut controller = ConversionController::new(mock);

    let outcome = controller.submit(text_request()).await;
    assert_eq!(outcome, failure("Request timed out"));
}

#[tokio::test]
async fn test_mismatched_kind_never_reaches_transport()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let mut controller = ConversionController::new(mock.clone());

    let request = ConversionRequest
    {   kind: ConversionKind::Screenshot
      , payload: ConversionPayload::Figma(
          "https://www.figma.com/file/abc123".to_string()
        )
    };
    let outcome = controller.submit(request).await;

    assert_eq!(outcome, failure("Unknown conversion type"));
    assert_eq!(mock.call_count(), 0);
    assert_eq!(controller.state().phase(), Phase::Resolved);
}

#[tokio::test]
async fn test_empty_text_never_reaches_transport()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let controller = ConversionController::new(mock.clone());

    let err = assert_err!(InputCollector::text("   \n\t"));
    assert!(matches!(err, Error::Validation(_)));
    assert_err!(InputCollector::figma(""));
    assert_err!(InputCollector::screenshot(vec![], "empty.png"));

    assert_eq!(mock.call_count(), 0);
    assert_eq!(controller.state(), ConversionState::Idle);
}

#[tokio::test]
async fn test_sequential_submits_are_independent()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let mut controller = ConversionController::new(mock.clone());
    mock.observe(controller.subscribe());

    let first = controller.submit(text_request()).await;
    let second = controller.submit(text_request()).await;

    assert_eq!(first, success("X"));
    assert_eq!(second, success("X"));
    assert_eq!(mock.call_count(), 2);
    // second attempt left Resolved for Pending before calling out
    assert_eq!(mock.phases_seen(), vec![Phase::Pending, Phase::Pending]);
}

#[tokio::test]
async fn test_new_submit_clears_previous_outcome()
{   let gate = Arc::new(Notify::new());
    let mock = MockTransport::replying(200, r#"{"code":"X"}"#)
      .gated(gate.clone());
    let backend = ConverterBackend::with_transport(mock);
    let mut state_rx = backend.state();

    gate.notify_one();
    let mut reply = assert_ok!(backend.submit(text_request()));
    assert_eq!(reply.recv().await, Some(success("X")));

    let mut reply = assert_ok!(backend.submit(text_request()));
    assert_ok!(
      state_rx.wait_for(|s| *s == ConversionState::Pending).await
    );
    assert_eq!(state_rx.borrow().outcome(), None);

    gate.notify_one();
    assert_eq!(reply.recv().await, Some(success("X")));
}

// ===== ConverterBackend =====

#[tokio::test]
async fn test_backend_submit_and_shutdown()
{   let mock = MockTransport::replying(200, r#"{"code":"<main/>"}"#);
    let backend = ConverterBackend::with_transport(mock.clone());

    let mut reply = assert_ok!(backend.submit(text_request()));
    assert_eq!(reply.recv().await, Some(success("<main/>")));
    assert!(!backend.is_busy());
    assert_eq!(
      *backend.state().borrow(),
      ConversionState::Resolved(success("<main/>"))
    );

    assert_ok!(backend.shutdown().await);
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_backend_refuses_second_submit_while_pending()
{   let gate = Arc::new(Notify::new());
    let mock = MockTransport::replying(200, r#"{"code":"X"}"#)
      .gated(gate.clone());
    let backend = ConverterBackend::with_transport(mock.clone());

    let mut first = assert_ok!(backend.submit(text_request()));
    assert!(backend.is_busy());
    assert_eq!(
      assert_err!(backend.submit(text_request())),
      Error::Busy
    );

    gate.notify_one();
    assert_eq!(first.recv().await, Some(success("X")));
    assert!(!backend.is_busy());
    assert_eq!(mock.call_count(), 1);

    gate.notify_one();
    let mut again = assert_ok!(backend.submit(text_request()));
    assert_eq!(again.recv().await, Some(success("X")));
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_backend_accepts_submit_once_resolved_is_seen()
{   let mock = MockTransport::replying(200, r#"{"code":"X"}"#);
    let backend = ConverterBackend::with_transport(mock.clone());
    let mut state_rx = backend.state();

    for attempt in 0..200
    {   state_rx.borrow_and_update();
        let _reply = match backend.submit(text_request())
        {   Ok(reply) => reply
          , Err(e) => panic!("attempt {} refused: {:?}", attempt, e)
        };

        // first Resolved published after this submit is our own
        loop
        {   assert_ok!(state_rx.changed().await);
            if state_rx.borrow_and_update().phase() == Phase::Resolved
            {   break;
            }
        }
    }

    assert_eq!(mock.call_count(), 200);
    assert_ok!(backend.shutdown().await);
}

// ===== ResultPresenter =====

#[test]
fn test_views_follow_state()
{   assert_eq!(View::from_state(&ConversionState::Idle), View::Blank);
    assert_eq!(
      View::from_state(&ConversionState::Pending),
      View::Loading
    );
    assert_eq!(
      View::from_state(&ConversionState::Resolved(failure("bad input"))),
      View::Error("bad input".to_string())
    );
    assert_eq!(
      View::from_state(&ConversionState::Resolved(success("<a/>"))),
      View::Code("<a/>".to_string())
    );
}

#[test]
fn test_view_rendering_and_copy()
{   assert_eq!(View::Loading.to_string(), "Loading... Please wait.");
    assert_eq!(
      View::Error("bad input".to_string()).to_string(),
      "Error!\nbad input"
    );

    let code = View::Code("<div>hi</div>".to_string());
    assert!(code.to_string().starts_with("Generated Code\n"));

    let mut sink = Vec::new();
    assert!(assert_ok!(code.copy_code(&mut sink)));
    assert_eq!(sink, b"<div>hi</div>");

    let mut untouched = Vec::new();
    assert!(!assert_ok!(View::Loading.copy_code(&mut untouched)));
    assert!(untouched.is_empty());
}
