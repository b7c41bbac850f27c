use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
    pub percentage: u32,
}

impl UploadProgress {
    /// `percentage` is `round(loaded / total * 100)`; an empty body counts as done.
    pub fn new(loaded: u64, total: u64) -> Self {
        let percentage = if total == 0 {
            100
        } else {
            ((loaded as f64 / total as f64) * 100.0).round() as u32
        };
        Self {
            loaded,
            total,
            percentage,
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Forwards backend progress to a caller's observer and guarantees a final
/// 100% report once the upload succeeded.
pub struct ProgressTracker {
    callback: ProgressCallback,
    total: u64,
    completed: AtomicBool,
}

impl ProgressTracker {
    pub fn new(callback: ProgressCallback, total: u64) -> Arc<Self> {
        Arc::new(Self {
            callback,
            total,
            completed: AtomicBool::new(false),
        })
    }

    pub fn report(&self, progress: UploadProgress) {
        if progress.percentage >= 100 {
            self.completed.store(true, Ordering::Relaxed);
        }
        (self.callback)(progress);
    }

    /// Emit a 100% report unless the backend already sent one.
    pub fn finish(&self) {
        if !self.completed.swap(true, Ordering::Relaxed) {
            (self.callback)(UploadProgress::new(self.total, self.total));
        }
    }

    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let tracker = Arc::clone(self);
        Arc::new(move |progress| tracker.report(progress))
    }
}

/// Split `body` into `chunk_size` pieces, calling `on_chunk` with the
/// cumulative byte count as each piece is handed to the transport.
pub fn chunked_body<F>(
    body: Bytes,
    chunk_size: usize,
    mut on_chunk: F,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static
where
    F: FnMut(u64) + Send + Sync + 'static,
{
    let chunk_size = chunk_size.max(1);
    let total = body.len();
    let mut offset = 0usize;
    futures::stream::iter(std::iter::from_fn(move || {
        if offset >= total {
            return None;
        }
        let end = (offset + chunk_size).min(total);
        let chunk = body.slice(offset..end);
        offset = end;
        on_chunk(end as u64);
        Some(Ok(chunk))
    }))
}
