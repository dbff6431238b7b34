//! Lazy, pull-based sequence of resolved resources

use crate::error::Result;
use crate::types::ResolvedResource;
use futures::future::BoxFuture;
use futures::stream::Stream;
use futures::{FutureExt, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Lazy sequence of `Result<ResolvedResource>`
///
/// Nothing happens until the sequence is polled. The producing traversal is
/// driven from inside `poll_next` on the consumer's own task, and the
/// hand-off channel holds a single element, so the traversal never runs more
/// than one resource ahead of the consumer.
///
/// Each element is either a resource or an error. The sequence ends right
/// after the first error. Dropping it cancels its traversal.
pub struct ResultSequence {
    rx: mpsc::Receiver<Result<ResolvedResource>>,
    producer: Option<BoxFuture<'static, ()>>,
    cancel: CancellationToken,
    finished: bool,
}

impl ResultSequence {
    /// Build a sequence around a producing traversal
    ///
    /// `produce` receives an `Emitter` and runs until it returns. An `Err`
    /// return becomes the final element of the sequence.
    pub fn new<F, Fut>(cancel: CancellationToken, produce: F) -> Self
    where
        F: FnOnce(Emitter) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);
        let emitter = Emitter {
            tx: tx.clone(),
            cancel: cancel.clone(),
        };
        let traversal = produce(emitter);

        let producer = async move {
            if let Err(err) = traversal.await {
                // Receiver is gone only if the sequence was dropped
                let _ = tx.send(Err(err)).await;
            }
        }
        .boxed();

        Self {
            rx,
            producer: Some(producer),
            cancel,
            finished: false,
        }
    }

    /// A sequence with no elements
    pub fn empty() -> Self {
        let (_, rx) = mpsc::channel(1);
        Self {
            rx,
            producer: None,
            cancel: CancellationToken::new(),
            finished: true,
        }
    }

    /// Cancellation signal of this sequence's traversal
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop the traversal at its next page boundary
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drain the sequence, failing on its error element
    pub async fn try_collect_all(mut self) -> Result<Vec<ResolvedResource>> {
        let mut resources = Vec::new();
        while let Some(item) = self.next().await {
            resources.push(item?);
        }
        Ok(resources)
    }
}

impl Stream for ResultSequence {
    type Item = Result<ResolvedResource>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        if let Some(producer) = this.producer.as_mut() {
            if producer.as_mut().poll(cx).is_ready() {
                // Dropping the producer drops the last sender
                this.producer = None;
            }
        }

        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(Ok(resource))) => Poll::Ready(Some(Ok(resource))),
            Poll::Ready(Some(Err(err))) => {
                this.finished = true;
                this.producer = None;
                this.cancel.cancel();
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for ResultSequence {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ResultSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSequence")
            .field("finished", &self.finished)
            .field("running", &self.producer.is_some())
            .finish_non_exhaustive()
    }
}

/// Producer half of a `ResultSequence`
#[derive(Debug, Clone)]
pub struct Emitter {
    tx: mpsc::Sender<Result<ResolvedResource>>,
    cancel: CancellationToken,
}

impl Emitter {
    /// Hand one resource to the consumer
    ///
    /// Returns once the consumer has pulled it, so no further work happens
    /// until the next element is requested. Returns `false` when the consumer
    /// is gone or the traversal was cancelled; producers should stop
    /// emitting then.
    pub async fn emit(&self, resource: ResolvedResource) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if self.tx.send(Ok(resource)).await.is_err() {
            self.cancel.cancel();
            return false;
        }

        // Capacity is one, so a permit is only free once the element is taken
        match self.tx.reserve().await {
            Ok(_permit) => true,
            Err(_) => {
                self.cancel.cancel();
                false
            }
        }
    }

    /// True once the traversal has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancellation signal shared with the sequence
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
