// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The zone operation poller.
//!
//! The poller is built from two closures: one to submit the request that
//! starts the operation, and one to query the status of the operation by
//! name. The closures capture any stubs, project and zone names they need.

use crate::model::{Operation, operation};
use crate::sink::{Discard, ProgressSink};
use crate::{Error, Event, Notification, PollResult, Poller, Result};
use gax::options::RequestOptions;
use gax::polling_backoff_policy::PollingBackoffPolicy;
use gax::polling_state::PollingState;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type CompletionFn = Box<dyn FnOnce(&PollResult) + Send>;

/// Creates a poller with the default sink, cancellation and completion
/// settings.
///
/// # Parameters
/// * `options` - the polling budget and backoff policy.
/// * `zone` - the zone name, used in log messages.
/// * `start` - submits the request. Called at most once.
/// * `query` - queries the status of the operation, given its name.
pub fn new_zone_poller<S, SF, Q, QF>(
    options: RequestOptions,
    zone: impl Into<String>,
    start: S,
    query: Q,
) -> impl Poller
where
    S: FnOnce() -> SF + Send,
    SF: Future<Output = Result<Operation>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = Result<Operation>> + Send,
{
    ZonePollerBuilder::new(start, query)
        .with_options(options)
        .with_zone(zone)
        .build()
}

/// Configures a zone operation poller.
///
/// # Example
/// ```
/// # use compute_ops_lro as lro;
/// # use lro::model::Operation;
/// use lro::{Poller, ZonePollerBuilder, sink};
/// use tokio_util::sync::CancellationToken;
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let (tx, mut rx) = sink::channel();
/// let cancel = CancellationToken::new();
/// let start = || async {
///     Ok::<_, lro::Error>(Operation::default().set_name("op-1").set_status("PENDING"))
/// };
/// let query = |name: String| async move {
///     Ok::<_, lro::Error>(Operation::default().set_name(name).set_status("DONE"))
/// };
/// let result = ZonePollerBuilder::new(start, query)
///     .with_zone("us-central1-f")
///     .with_sink(tx)
///     .with_cancellation(cancel.clone())
///     .with_completion(|r| println!("completed: {}", r.message()))
///     .build()
///     .until_done()
///     .await;
/// assert!(result.is_success());
/// assert!(rx.try_recv().is_ok());
/// # });
/// ```
pub struct ZonePollerBuilder<S, Q> {
    start: S,
    query: Q,
    zone: String,
    settings: Settings,
}

impl<S, Q> ZonePollerBuilder<S, Q> {
    /// Creates a builder from the submission and query closures.
    pub fn new(start: S, query: Q) -> Self {
        Self::from_parts(start, query, String::new(), Settings::default())
    }

    pub(crate) fn from_parts(start: S, query: Q, zone: String, settings: Settings) -> Self {
        Self {
            start,
            query,
            zone,
            settings,
        }
        .with_zone_name()
    }

    fn with_zone_name(mut self) -> Self {
        self.zone = crate::self_link::name_from_self_link(&self.zone)
            .unwrap_or_default()
            .to_string();
        self
    }

    /// Sets the zone name, used in log messages.
    ///
    /// Full zone URLs are reduced to their last path segment.
    pub fn with_zone(mut self, v: impl Into<String>) -> Self {
        self.zone = v.into();
        self.with_zone_name()
    }

    /// Replaces the polling options.
    pub fn with_options(mut self, v: RequestOptions) -> Self {
        self.settings.options = v;
        self
    }

    /// Sets the sink receiving the poll sequence events.
    pub fn with_sink<T>(mut self, v: T) -> Self
    where
        T: ProgressSink + 'static,
    {
        self.settings.set_sink(v);
        self
    }

    /// Sets the token used to cancel the poll sequence.
    ///
    /// Cancelling the token stops the sequence at the next suspension point:
    /// the submission, a status query, or a backoff sleep. A cancelled
    /// sequence reports [PollResult::Cancelled] to the direct caller only. It
    /// does not notify the sink or call the completion callback.
    pub fn with_cancellation(mut self, v: CancellationToken) -> Self {
        self.settings.cancel = v;
        self
    }

    /// Sets a callback invoked once with the terminal outcome.
    ///
    /// The callback runs after the sink receives the terminal event. It is
    /// not called for cancelled sequences.
    pub fn with_completion<F>(mut self, v: F) -> Self
    where
        F: FnOnce(&PollResult) + Send + 'static,
    {
        self.settings.set_completion(v);
        self
    }

    /// Creates the poller.
    pub fn build<SF, QF>(self) -> impl Poller
    where
        S: FnOnce() -> SF + Send,
        SF: Future<Output = Result<Operation>> + Send,
        Q: FnMut(String) -> QF + Send,
        QF: Future<Output = Result<Operation>> + Send,
    {
        let Settings {
            options,
            sink,
            cancel,
            completion,
        } = self.settings;
        ZonePoller {
            state: State::Start(self.start),
            query: self.query,
            zone: self.zone,
            max_attempts: options.max_polling_attempts(),
            backoff: options.polling_backoff_policy(),
            polling: PollingState::default(),
            sink,
            cancel,
            completion,
        }
    }
}

impl<S, Q> gax::options::internal::RequestBuilder for ZonePollerBuilder<S, Q> {
    fn request_options(&mut self) -> &mut RequestOptions {
        &mut self.settings.options
    }
}

/// The poller configuration shared by [ZonePollerBuilder] and the client
/// request builders.
pub(crate) struct Settings {
    pub(crate) options: RequestOptions,
    pub(crate) sink: Arc<dyn ProgressSink>,
    pub(crate) cancel: CancellationToken,
    pub(crate) completion: Option<CompletionFn>,
}

impl Settings {
    pub(crate) fn set_sink<T>(&mut self, v: T)
    where
        T: ProgressSink + 'static,
    {
        self.sink = Arc::new(v);
    }

    pub(crate) fn set_completion<F>(&mut self, v: F)
    where
        F: FnOnce(&PollResult) + Send + 'static,
    {
        self.completion = Some(Box::new(v));
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            options: RequestOptions::default(),
            sink: Arc::new(Discard),
            cancel: CancellationToken::new(),
            completion: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("options", &self.options)
            .field("cancel", &self.cancel)
            .field("completion", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

enum State<S> {
    Start(S),
    Polling(String),
    // Holds the outcome until `until_done()` consumes it.
    Done(Option<PollResult>),
}

struct ZonePoller<S, Q> {
    state: State<S>,
    query: Q,
    zone: String,
    max_attempts: u32,
    backoff: Arc<dyn PollingBackoffPolicy>,
    polling: PollingState,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
    completion: Option<CompletionFn>,
}

impl<S, Q> crate::sealed::Poller for ZonePoller<S, Q> {}

impl<S, SF, Q, QF> Poller for ZonePoller<S, Q>
where
    S: FnOnce() -> SF + Send,
    SF: Future<Output = Result<Operation>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = Result<Operation>> + Send,
{
    async fn poll(&mut self) -> Option<Event> {
        match std::mem::replace(&mut self.state, State::Done(None)) {
            State::Done(outcome) => {
                self.state = State::Done(outcome);
                None
            }
            State::Start(start) => {
                if self.cancel.is_cancelled() {
                    return Some(self.cancelled());
                }
                let name = match cancellable(&self.cancel, start()).await {
                    None => return Some(self.cancelled()),
                    Some(result) => match self::handle_start(result) {
                        Ok(name) => name,
                        Err(e) => return Some(self.complete(PollResult::TransportError(e))),
                    },
                };
                tracing::debug!(operation = %name, zone = %self.zone, "zone operation submitted");
                self.polling = PollingState::default();
                if self.polling.attempt_count >= self.max_attempts {
                    return Some(self.exhausted(name));
                }
                Some(self.query_once(name).await)
            }
            State::Polling(name) => {
                if self.polling.attempt_count >= self.max_attempts {
                    return Some(self.exhausted(name));
                }
                let wait = self.backoff.wait_period(&self.polling);
                if cancellable(&self.cancel, tokio::time::sleep(wait))
                    .await
                    .is_none()
                {
                    return Some(self.cancelled());
                }
                Some(self.query_once(name).await)
            }
        }
    }

    async fn until_done(mut self) -> PollResult {
        while let Some(event) = self.poll().await {
            match event {
                // Return, the operation reached a terminal state, the budget
                // is exhausted, or the sequence was cancelled.
                Event::Completed(result) => return result,
                // Continue, `poll()` waits before the next query.
                Event::Progress(_) => (),
            }
        }
        // The caller drained the events with `poll()`. A sequence abandoned
        // mid-step has no recorded outcome and counts as cancelled.
        match self.state {
            State::Done(Some(result)) => result,
            _ => PollResult::Cancelled,
        }
    }

    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = Event> + Unpin {
        use futures::stream::unfold;
        Box::pin(unfold(Some(self), move |state| async move {
            if let Some(mut poller) = state {
                if let Some(event) = poller.poll().await {
                    return Some((event, Some(poller)));
                }
            };
            None
        }))
    }
}

impl<S, SF, Q, QF> ZonePoller<S, Q>
where
    S: FnOnce() -> SF + Send,
    SF: Future<Output = Result<Operation>> + Send,
    Q: FnMut(String) -> QF + Send,
    QF: Future<Output = Result<Operation>> + Send,
{
    async fn query_once(&mut self, name: String) -> Event {
        self.polling.attempt_count += 1;
        let attempt = self.polling.attempt_count;
        tracing::debug!(
            operation = %name,
            zone = %self.zone,
            attempt,
            "querying zone operation status"
        );
        let result = match cancellable(&self.cancel, (self.query)(name.clone())).await {
            None => return self.cancelled(),
            Some(r) => r,
        };
        match self::handle_poll(result) {
            Err(result) => self.complete(result),
            Ok(operation) => {
                self.state = State::Polling(name);
                let event = Event::Progress(Notification { attempt, operation });
                self.sink.notify(event.clone());
                event
            }
        }
    }
}

impl<S, Q> ZonePoller<S, Q> {
    fn complete(&mut self, result: PollResult) -> Event {
        self.state = State::Done(Some(result.clone()));
        let attempts = self.polling.attempt_count;
        let zone = self.zone.as_str();
        match &result {
            PollResult::Succeeded(op) => {
                tracing::info!(operation = %op.name, zone, attempts, "zone operation succeeded")
            }
            PollResult::Failed(op) => {
                tracing::warn!(operation = %op.name, zone, attempts, "zone operation failed")
            }
            PollResult::UnknownStatus { operation, status } => tracing::error!(
                operation = %operation.name,
                zone,
                attempts,
                status = %status,
                "zone operation returned an unknown status"
            ),
            PollResult::ExhaustedRetries { name, .. } => tracing::warn!(
                operation = %name,
                zone,
                attempts,
                "zone operation still running after the last status query"
            ),
            PollResult::TransportError(e) => tracing::warn!(
                zone,
                attempts,
                error = %e,
                "cannot submit or query the zone operation"
            ),
            PollResult::Cancelled => (),
        }
        self.sink.notify(Event::Completed(result.clone()));
        if let Some(callback) = self.completion.take() {
            callback(&result);
        }
        Event::Completed(result)
    }

    fn exhausted(&mut self, name: String) -> Event {
        let attempts = self.polling.attempt_count;
        self.complete(PollResult::ExhaustedRetries { name, attempts })
    }

    fn cancelled(&mut self) -> Event {
        self.state = State::Done(Some(PollResult::Cancelled));
        tracing::debug!(
            zone = %self.zone,
            attempts = self.polling.attempt_count,
            "poll sequence cancelled"
        );
        Event::Completed(PollResult::Cancelled)
    }
}

/// Runs `fut` unless `token` is cancelled first.
///
/// Returns `None` on cancellation. An already cancelled token wins over a
/// ready future.
async fn cancellable<F>(token: &CancellationToken, fut: F) -> Option<F::Output>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        r = fut => Some(r),
    }
}

/// Extracts the operation name from the submission response.
fn handle_start(result: Result<Operation>) -> Result<String> {
    let operation = result?;
    if operation.name.is_empty() {
        return Err(Error::deser(
            "the submitted zone operation is missing its name",
        ));
    }
    Ok(operation.name)
}

/// Classifies a status query response.
///
/// Returns the operation if it is still in progress, and the terminal outcome
/// otherwise.
fn handle_poll(result: Result<Operation>) -> std::result::Result<Operation, PollResult> {
    let operation = match result {
        Err(e) => return Err(PollResult::TransportError(e)),
        Ok(o) => o,
    };
    match &operation.status {
        operation::Status::Pending | operation::Status::Running => Ok(operation),
        operation::Status::Done => Err(PollResult::Succeeded(operation)),
        operation::Status::Error => Err(PollResult::Failed(operation)),
        operation::Status::Unknown(s) => {
            let status = s.clone();
            Err(PollResult::UnknownStatus { operation, status })
        }
    }
}
