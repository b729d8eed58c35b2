//! Runs engine commands against the gateway on a tokio runtime.
//!
//! Every dispatched command produces exactly one [`Completion`] on the
//! channel returned by [`Dispatcher::new`], bounded by the request timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mailpilot_gateway::{Gateway, GatewayError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::{ActionCall, Command, Completion};

pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    runtime: Handle,
    timeout: Duration,
    completions: UnboundedSender<Completion>,
}

impl Dispatcher {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        runtime: Handle,
        timeout: Duration,
    ) -> (Self, UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        (
            Self {
                gateway,
                runtime,
                timeout,
                completions,
            },
            receiver,
        )
    }

    /// Spawn the gateway call for `command`. Returns false when nothing was spawned.
    pub fn dispatch(&self, command: Command) -> bool {
        let gateway = Arc::clone(&self.gateway);
        let timeout = self.timeout;
        let completions = self.completions.clone();

        match command {
            Command::None | Command::Quit => return false,
            Command::SubmitEmail { email } => {
                self.runtime.spawn(async move {
                    let outcome = bounded(timeout, gateway.submit_email(&email)).await;
                    deliver(
                        &completions,
                        Completion::EmailSubmitted {
                            mail_id: email.mail_id,
                            outcome,
                        },
                    );
                });
            }
            Command::ApproveAction { index, action_id } => {
                self.runtime.spawn(async move {
                    let outcome = bounded(timeout, gateway.approve_action(&action_id)).await;
                    deliver(
                        &completions,
                        Completion::ActionUpdated {
                            call: ActionCall::Approve,
                            index,
                            outcome,
                        },
                    );
                });
            }
            Command::RejectAction { index, action_id } => {
                self.runtime.spawn(async move {
                    let outcome = bounded(timeout, gateway.reject_action(&action_id)).await;
                    deliver(
                        &completions,
                        Completion::ActionUpdated {
                            call: ActionCall::Reject,
                            index,
                            outcome,
                        },
                    );
                });
            }
            Command::ModifyAction {
                index,
                action_id,
                payload,
                apply_to_general,
            } => {
                self.runtime.spawn(async move {
                    let call = gateway.modify_action(&action_id, &payload, apply_to_general);
                    let outcome = bounded(timeout, call).await;
                    deliver(
                        &completions,
                        Completion::ActionUpdated {
                            call: ActionCall::Modify,
                            index,
                            outcome,
                        },
                    );
                });
            }
        }
        true
    }
}

/// Await `call` for at most `after`, flattening every failure to its display text.
async fn bounded<T>(
    after: Duration,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, String> {
    match tokio::time::timeout(after, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(_) => Err(GatewayError::Timeout { after }.to_string()),
    }
}

fn deliver(completions: &UnboundedSender<Completion>, completion: Completion) {
    if completions.send(completion).is_err() {
        tracing::debug!("completion dropped: event loop has exited");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mailpilot_core::samples::lunch_thread;
    use mailpilot_core::{Action, Classification, Email, JsonObject, SubmissionResult};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<String>>,
        stall: bool,
        fail_with_status: Option<u16>,
    }

    impl FakeGateway {
        async fn respond(&self, label: String) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(label);
            if self.stall {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            if let Some(status) = self.fail_with_status {
                return Err(GatewayError::Status {
                    path: "/action/approve".to_owned(),
                    status,
                    body: "nope".to_owned(),
                });
            }
            Ok(())
        }
    }

    fn action(id: &str, status: &str) -> Action {
        Action {
            action_id: id.to_owned(),
            mail_id: None,
            action_type: "draft_reply".to_owned(),
            status: status.to_owned(),
            payload: JsonObject::new(),
            result: None,
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn submit_email(&self, email: &Email) -> Result<SubmissionResult, GatewayError> {
            self.respond(format!("submit {}", email.mail_id)).await?;
            Ok(SubmissionResult {
                mail_id: email.mail_id.clone(),
                summary: None,
                proposed_actions: vec![action("a0", "pending")],
                classification: Classification::default(),
            })
        }

        async fn approve_action(&self, action_id: &str) -> Result<Action, GatewayError> {
            self.respond(format!("approve {action_id}")).await?;
            Ok(action(action_id, "approved"))
        }

        async fn reject_action(&self, action_id: &str) -> Result<Action, GatewayError> {
            self.respond(format!("reject {action_id}")).await?;
            Ok(action(action_id, "rejected"))
        }

        async fn modify_action(
            &self,
            action_id: &str,
            payload: &JsonObject,
            apply_to_general_preferences: bool,
        ) -> Result<Action, GatewayError> {
            self.respond(format!(
                "modify {action_id} {} general={apply_to_general_preferences}",
                serde_json::Value::Object(payload.clone())
            ))
            .await?;
            Ok(action(action_id, "modified"))
        }
    }

    fn dispatcher(
        gateway: FakeGateway,
        timeout: Duration,
    ) -> (Arc<FakeGateway>, Dispatcher, UnboundedReceiver<Completion>) {
        let gateway = Arc::new(gateway);
        let shared: Arc<dyn Gateway> = gateway.clone();
        let (dispatcher, receiver) = Dispatcher::new(shared, Handle::current(), timeout);
        (gateway, dispatcher, receiver)
    }

    #[tokio::test]
    async fn submit_produces_one_keyed_completion() {
        let (gateway, dispatcher, mut receiver) =
            dispatcher(FakeGateway::default(), Duration::from_secs(5));
        let email = lunch_thread().remove(1);
        assert!(dispatcher.dispatch(Command::SubmitEmail { email }));

        let completion = receiver.recv().await.expect("completion");
        let Completion::EmailSubmitted { mail_id, outcome } = completion else {
            panic!("unexpected completion {completion:?}");
        };
        assert_eq!(mail_id, "mail-2");
        assert_eq!(outcome.map(|result| result.action_count()), Ok(1));
        assert_eq!(*gateway.calls.lock().unwrap(), vec!["submit mail-2".to_owned()]);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn action_completions_carry_call_and_index() {
        let (_gateway, dispatcher, mut receiver) =
            dispatcher(FakeGateway::default(), Duration::from_secs(5));
        dispatcher.dispatch(Command::RejectAction {
            index: 3,
            action_id: "a3".to_owned(),
        });
        let completion = receiver.recv().await.expect("completion");
        assert_eq!(
            completion,
            Completion::ActionUpdated {
                call: ActionCall::Reject,
                index: 3,
                outcome: Ok(action("a3", "rejected")),
            }
        );
    }

    #[tokio::test]
    async fn modify_forwards_payload_and_scope() {
        let (gateway, dispatcher, mut receiver) =
            dispatcher(FakeGateway::default(), Duration::from_secs(5));
        let mut payload = JsonObject::new();
        payload.insert("k".to_owned(), json!(1));
        dispatcher.dispatch(Command::ModifyAction {
            index: 0,
            action_id: "a0".to_owned(),
            payload,
            apply_to_general: true,
        });
        receiver.recv().await.expect("completion");
        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec![r#"modify a0 {"k":1} general=true"#.to_owned()]
        );
    }

    #[tokio::test]
    async fn gateway_errors_become_display_text() {
        let gateway = FakeGateway {
            fail_with_status: Some(404),
            ..FakeGateway::default()
        };
        let (_gateway, dispatcher, mut receiver) = dispatcher(gateway, Duration::from_secs(5));
        dispatcher.dispatch(Command::ApproveAction {
            index: 0,
            action_id: "a0".to_owned(),
        });
        let completion = receiver.recv().await.expect("completion");
        let Completion::ActionUpdated { outcome, .. } = completion else {
            panic!("unexpected completion {completion:?}");
        };
        assert_eq!(outcome, Err("post /action/approve: status 404: nope".to_owned()));
    }

    #[tokio::test]
    async fn stalled_calls_time_out() {
        let gateway = FakeGateway {
            stall: true,
            ..FakeGateway::default()
        };
        let (_gateway, dispatcher, mut receiver) = dispatcher(gateway, Duration::from_millis(50));
        dispatcher.dispatch(Command::ApproveAction {
            index: 0,
            action_id: "a0".to_owned(),
        });
        let completion = receiver.recv().await.expect("completion");
        let Completion::ActionUpdated { outcome, .. } = completion else {
            panic!("unexpected completion {completion:?}");
        };
        assert_eq!(outcome, Err("request timed out after 0s".to_owned()));
    }

    #[tokio::test]
    async fn none_and_quit_spawn_nothing() {
        let (gateway, dispatcher, mut receiver) =
            dispatcher(FakeGateway::default(), Duration::from_secs(5));
        assert!(!dispatcher.dispatch(Command::None));
        assert!(!dispatcher.dispatch(Command::Quit));
        tokio::task::yield_now().await;
        assert!(receiver.try_recv().is_err());
        assert!(gateway.calls.lock().unwrap().is_empty());
    }
}
