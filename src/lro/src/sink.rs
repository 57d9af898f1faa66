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

//! Deliver poll sequence events to the application.
//!
//! The poller runs as an async task, typically spawned away from the code
//! that shows progress to users. A [ProgressSink] receives each [Event] as it
//! is produced, in attempt order, with the terminal event last.
//!
//! # Example
//! ```
//! # use compute_ops_lro::{sink, Event, Progress};
//! let (tx, mut rx) = sink::channel();
//! // ... give `tx` to a poller with `ZonePollerBuilder::with_sink(tx)` ...
//! # drop(tx);
//! while let Ok(event) = rx.try_recv() {
//!     match event {
//!         Event::Progress(n) => println!("{} ({})", Progress::StillRunning, n.attempt),
//!         Event::Completed(r) => println!("{}", r.message()),
//!     }
//! }
//! ```

use crate::Event;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Receives the events produced by a poll sequence.
///
/// Implementations must not block. The poller calls `notify` from its own
/// task, between network calls.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, event: Event);
}

/// Events are dropped if the receiver is gone.
impl ProgressSink for UnboundedSender<Event> {
    fn notify(&self, event: Event) {
        if self.send(event).is_err() {
            tracing::debug!("progress receiver closed, dropping event");
        }
    }
}

impl<T> ProgressSink for Arc<T>
where
    T: ProgressSink + ?Sized,
{
    fn notify(&self, event: Event) {
        self.as_ref().notify(event)
    }
}

/// Creates a sender and receiver pair for poll sequence events.
///
/// The receiver supports both synchronous (`try_recv`) and asynchronous
/// (`recv`) consumption.
pub fn channel() -> (UnboundedSender<Event>, UnboundedReceiver<Event>) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Adapts a closure into a [ProgressSink].
///
/// # Example
/// ```
/// # use compute_ops_lro::{sink, Event, ProgressSink};
/// let sink = sink::from_fn(|event: Event| {
///     if let Event::Completed(r) = event {
///         println!("{}", r.message());
///     }
/// });
/// # sink.notify(Event::Completed(compute_ops_lro::PollResult::Cancelled));
/// ```
pub fn from_fn<F>(f: F) -> FnSink<F>
where
    F: Fn(Event) + Send + Sync,
{
    FnSink(f)
}

/// The [ProgressSink] returned by [from_fn].
#[derive(Clone)]
pub struct FnSink<F>(F);

impl<F> ProgressSink for FnSink<F>
where
    F: Fn(Event) + Send + Sync,
{
    fn notify(&self, event: Event) {
        (self.0)(event)
    }
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

/// A [ProgressSink] that ignores all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl ProgressSink for Discard {
    fn notify(&self, _event: Event) {}
}
