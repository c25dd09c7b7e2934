use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use sheet_layout::ProgressEvent;
use tokio::sync::broadcast;
use tokio_stream::{
    Stream,
    wrappers::{BroadcastStream, errors::BroadcastStreamRecvError},
};
use uuid::Uuid;

/// Registry of live progress channels keyed by job id.
///
/// A channel is created lazily by whichever side shows up first: the SSE
/// observer subscribing, or the upload handler starting to publish. It is
/// removed when the upload finishes, and also when the last subscriber
/// disconnects, so job ids that never see an upload do not accumulate.
#[derive(Clone, Default)]
pub struct Jobs {
    inner: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ProgressEvent>>>>,
}

impl Jobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the broadcast sender for a job, creating the channel if needed.
    pub fn channel(&self, job: Uuid) -> broadcast::Sender<ProgressEvent> {
        let mut map = self.inner.lock().expect("jobs registry poisoned");
        map.entry(job)
            .or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }

    /// Subscribe to a job's progress events. Dropping the returned stream
    /// evicts the job's channel once no other subscribers remain.
    pub fn subscribe(&self, job: Uuid) -> ProgressSubscription {
        let rx = self.channel(job).subscribe();
        ProgressSubscription {
            stream: Some(BroadcastStream::new(rx)),
            jobs: self.clone(),
            job,
        }
    }

    /// Drop the channel for a finished job; subscribers see the stream end.
    pub fn remove(&self, job: &Uuid) {
        let mut map = self.inner.lock().expect("jobs registry poisoned");
        map.remove(job);
    }

    fn evict_if_unobserved(&self, job: &Uuid) {
        let mut map = self.inner.lock().expect("jobs registry poisoned");
        if let Some(tx) = map.get(job) {
            if tx.receiver_count() == 0 {
                map.remove(job);
            }
        }
    }

    #[cfg(test)]
    fn contains(&self, job: &Uuid) -> bool {
        self.inner.lock().unwrap().contains_key(job)
    }
}

/// One observer's view of a job's progress channel.
pub struct ProgressSubscription {
    stream: Option<BroadcastStream<ProgressEvent>>,
    jobs: Jobs,
    job: Uuid,
}

impl Stream for ProgressSubscription {
    type Item = std::result::Result<ProgressEvent, BroadcastStreamRecvError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.stream.as_mut() {
            Some(stream) => Pin::new(stream).poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Drop for ProgressSubscription {
    fn drop(&mut self) {
        // Release the receiver before counting the remaining ones.
        self.stream.take();
        self.jobs.evict_if_unobserved(&self.job);
    }
}
