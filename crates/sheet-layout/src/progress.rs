use tokio::sync::mpsc;

/// Progress of a single layout run. One event is emitted per placed image,
/// plus one terminal event at exactly 100 once the document is finalized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEvent {
    pub processed: usize,
    pub total: usize,
    /// 0-100, rounded
    pub percent: u8,
    pub label: String,
}

impl ProgressEvent {
    pub(crate) fn placed(processed: usize, total: usize) -> Self {
        let percent = (processed as f32 / total as f32 * 100.0).round() as u8;
        Self {
            processed,
            total,
            percent,
            label: format!("{} of {} images placed", processed, total),
        }
    }

    pub(crate) fn finished(total: usize) -> Self {
        Self {
            processed: total,
            total,
            percent: 100,
            label: "finished".to_string(),
        }
    }
}

/// Per-request observer handle passed into the layout call. Sending is
/// fire-and-forget: a dropped or absent receiver never blocks or fails the
/// layout.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSender {
    /// Create an observer handle and the receiving end it reports to.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn send(&self, event: ProgressEvent) {
        let _ = self.tx.send(event);
    }
}
