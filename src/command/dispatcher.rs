//! Command dispatcher: one request per invocation, streamed into the editor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{
    ClientOptions, Command, DomainContext, GenerationService, Invocation, Notification, Notifier,
};
use crate::editor::{lock_session, SharedSession};
use crate::error::Error;
use crate::model::Selection;
use crate::parser::ParseOptions;
use crate::stream::{InsertionPipeline, StreamEnvelope};

/// How an invocation ended.
#[derive(Debug)]
pub enum Outcome {
    /// The stream finished and every line was spliced.
    Completed {
        /// Parsed blocks spliced into the document
        inserted: usize,
    },
    /// The user cancelled or a newer invocation took over.
    ///
    /// Blocks spliced before cancellation stay in the document.
    Cancelled {
        /// Parsed blocks spliced before cancellation
        inserted: usize,
    },
    /// The invocation failed; the user has been notified once.
    Failed(Error),
}

impl Outcome {
    /// Check if the invocation completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed { .. })
    }

    /// Check if the invocation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled { .. })
    }

    /// The error, if the invocation failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Routes commands to a generation service and their output into a session.
///
/// At most one invocation is in flight per dispatcher: starting a new one
/// cancels the previous one. Dropping the dispatcher cancels the active one.
pub struct CommandDispatcher {
    service: Arc<dyn GenerationService>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
    envelope: StreamEnvelope,
    parse: ParseOptions,
    next_id: AtomicU64,
    active: Mutex<Option<(u64, CancellationToken)>>,
}

impl CommandDispatcher {
    /// Create a dispatcher with default timeout, envelope and parser options.
    pub fn new(service: Arc<dyn GenerationService>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_options(service, notifier, &ClientOptions::default())
    }

    /// Create a dispatcher taking timeout, envelope and parser options from
    /// client options.
    pub fn with_options(
        service: Arc<dyn GenerationService>,
        notifier: Arc<dyn Notifier>,
        options: &ClientOptions,
    ) -> Self {
        Self {
            service,
            notifier,
            timeout: options.timeout,
            envelope: options.envelope,
            parse: options.parse.clone(),
            next_id: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    /// Set the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if an invocation is in flight.
    pub fn is_busy(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Cancel the in-flight invocation, if any.
    pub fn cancel(&self) {
        if let Some((_, token)) = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            log::debug!("Cancelling in-flight invocation");
            token.cancel();
        }
    }

    /// Run a command against the session.
    ///
    /// The session selection is captured here, once; a selection change
    /// while the request is pending does not move the replaced range.
    ///
    /// Never returns an error: failures are notified once and reported as
    /// [`Outcome::Failed`].
    pub async fn invoke(&self, session: &SharedSession, invocation: Invocation) -> Outcome {
        let selection = lock_session(session).selection;
        self.dispatch(session, invocation, selection).await
    }

    /// Run a command on whatever the session currently has selected.
    pub async fn invoke_on_selection(
        &self,
        session: &SharedSession,
        command: Command,
        prompt: Option<String>,
        context: DomainContext,
    ) -> Outcome {
        let (selection, selected) = {
            let editor = lock_session(session);
            (editor.selection, editor.selected_text())
        };
        let mut invocation = Invocation::new(command, context);
        if !selected.trim().is_empty() {
            invocation = invocation.with_selection(selected);
        }
        if let Some(prompt) = prompt {
            invocation = invocation.with_prompt(prompt);
        }
        self.dispatch(session, invocation, selection).await
    }

    async fn dispatch(
        &self,
        session: &SharedSession,
        invocation: Invocation,
        selection: Selection,
    ) -> Outcome {
        if let Err(err) = invocation.validate() {
            return self.fail(err);
        }

        let (id, token) = self.begin();
        let outcome = self.run(session, &invocation, selection, &token).await;
        self.end(id);
        outcome
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace((id, token.clone()));
        if let Some((_, previous)) = previous {
            log::debug!("New invocation supersedes the in-flight one");
            previous.cancel();
        }
        (id, token)
    }

    fn end(&self, id: u64) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        // A newer invocation may already own the slot.
        if active.as_ref().is_some_and(|(current, _)| *current == id) {
            *active = None;
        }
    }

    async fn run(
        &self,
        session: &SharedSession,
        invocation: &Invocation,
        selection: Selection,
        token: &CancellationToken,
    ) -> Outcome {
        let deadline = Instant::now() + self.timeout;
        let request = invocation.to_request();
        log::debug!(
            "Invoking '{}' ({} context)",
            request.command,
            request.context
        );

        let mut stream = tokio::select! {
            biased;
            _ = token.cancelled() => return Outcome::Cancelled { inserted: 0 },
            result = tokio::time::timeout_at(deadline, self.service.generate(&request)) => {
                match result {
                    Ok(Ok(stream)) => stream,
                    Ok(Err(err)) => return self.fail(err),
                    Err(_) => return self.fail(Error::Timeout(self.timeout)),
                }
            }
        };

        let mut pipeline = InsertionPipeline::new(self.envelope, self.parse.clone());
        {
            let mut editor = lock_session(session);
            let replace = invocation.selection().is_some();
            pipeline.start(&mut editor.document, Some(&selection), replace);
            if replace {
                editor.selection = Selection::caret(selection.from());
            }
        }

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    pipeline.cancel();
                    log::debug!("Invocation cancelled after {} blocks", pipeline.inserted());
                    return Outcome::Cancelled { inserted: pipeline.inserted() };
                }
                next = tokio::time::timeout_at(deadline, stream.next()) => next,
            };

            let chunk = match next {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(None) => break,
                Ok(Some(Err(err))) => {
                    pipeline.cancel();
                    return self.fail(err);
                }
                Err(_) => {
                    pipeline.cancel();
                    return self.fail(Error::Timeout(self.timeout));
                }
            };

            let mut editor = lock_session(session);
            if let Err(err) = pipeline.push_chunk(&mut editor.document, &chunk) {
                return self.fail(err);
            }
        }

        let mut editor = lock_session(session);
        if let Err(err) = pipeline.finish(&mut editor.document) {
            return self.fail(err);
        }
        editor.prompt_draft.clear();
        log::debug!("Invocation completed, {} blocks", pipeline.inserted());
        Outcome::Completed {
            inserted: pipeline.inserted(),
        }
    }

    fn fail(&self, err: Error) -> Outcome {
        log::debug!("Invocation failed: {}", err);
        self.notifier.notify(Notification::from_error(&err));
        Outcome::Failed(err)
    }
}

impl Drop for CommandDispatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
