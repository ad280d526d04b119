use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::signals::{CollaboratorError, Embedder, GrammarChecker, SentimentClassifier};

/// Bounds every call to the wrapped collaborator by `timeout`. The call runs
/// on a worker thread; an expired deadline is reported as a collaborator
/// failure and the worker is left to finish on its own.
pub struct TimeBoxed<C: ?Sized> {
    inner: Arc<C>,
    timeout: Duration,
}

impl<C: ?Sized> TimeBoxed<C> {
    pub fn new(inner: Arc<C>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn run_bounded<T, F>(name: &str, timeout: Duration, job: F) -> Result<T, CollaboratorError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CollaboratorError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("collab-{name}"))
        .spawn(move || {
            let _ = tx.send(job());
        })
        .map_err(|e| CollaboratorError::Failed(format!("{name}: cannot spawn worker: {e}")))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(CollaboratorError::Timeout {
            name: name.to_string(),
            millis: timeout.as_millis() as u64,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(CollaboratorError::Failed(format!(
            "{name}: worker exited without a result"
        ))),
    }
}

impl<C: GrammarChecker + ?Sized + 'static> GrammarChecker for TimeBoxed<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn count_issues(&self, text: &str) -> Result<u32, CollaboratorError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_bounded(self.inner.name(), self.timeout, move || {
            inner.count_issues(&text)
        })
    }
}

impl<C: SentimentClassifier + ?Sized + 'static> SentimentClassifier for TimeBoxed<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn max_input_chars(&self) -> usize {
        self.inner.max_input_chars()
    }

    fn positivity(&self, text: &str) -> Result<f64, CollaboratorError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_bounded(self.inner.name(), self.timeout, move || {
            inner.positivity(&text)
        })
    }
}

impl<C: Embedder + ?Sized + 'static> Embedder for TimeBoxed<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        run_bounded(self.inner.name(), self.timeout, move || inner.embed(&text))
    }
}
