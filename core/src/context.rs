//! Per-call cancellation and deadlines.
//!
//! # Design
//! A `Context` is threaded through each call and raced against the single
//! network wait. Cancellation is a `watch` channel flipped by a
//! [`CancelHandle`]; a deadline is a tokio `Instant`. Deriving a context with
//! a deadline keeps the earlier of the two deadlines. Deriving one with a new
//! cancel signal keeps the parent's signals too, so cancelling any ancestor
//! cancels the child. Clones share every signal.

use std::future::{pending, poll_fn, Future};
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct Context {
    canceled: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every context derived from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that is canceled when the returned handle is used,
    /// or when any handle of a parent context is.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.canceled.push(rx);
        (self, CancelHandle { tx })
    }

    pub fn with_deadline(self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Error> {
        if self.canceled.iter().any(|rx| *rx.borrow()) {
            return Some(Error::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is canceled or its deadline passes, with the
    /// matching error. Never resolves for a background context.
    pub async fn done(&self) -> Error {
        // Each wait yields false once its handle is dropped without firing.
        let mut waits: Vec<Pin<Box<dyn Future<Output = bool> + Send>>> = self
            .canceled
            .iter()
            .cloned()
            .map(|mut rx| {
                Box::pin(async move { rx.wait_for(|canceled| *canceled).await.is_ok() }) as _
            })
            .collect();
        let canceled = poll_fn(move |cx| {
            let mut fired = false;
            waits.retain_mut(|wait| match wait.as_mut().poll(cx) {
                Poll::Ready(true) => {
                    fired = true;
                    true
                }
                Poll::Ready(false) => false,
                Poll::Pending => true,
            });
            if fired {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        });
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            _ = canceled => Error::Canceled,
            _ = expired => Error::DeadlineExceeded,
        }
    }
}
