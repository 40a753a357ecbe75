use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{Result, RutOcrError};

pub(crate) type EngineFactory<E> = Arc<dyn Fn() -> std::result::Result<E, String> + Send + Sync>;

/// Bounded set of OCR engines shared by all requests.
///
/// A semaphore caps the number of leases; waiting for one is async, so a
/// queued request holds no blocking-pool thread. Engines are created lazily
/// up to the cap and returned to the idle list when their lease drops, which
/// for a timed-out job happens only once the job itself finishes.
pub(crate) struct EnginePool<E> {
    idle: Arc<Mutex<Vec<E>>>,
    permits: Arc<Semaphore>,
    factory: EngineFactory<E>,
}

impl<E: Send + 'static> EnginePool<E> {
    pub(crate) fn new(size: usize, factory: EngineFactory<E>) -> Self {
        let size = size.max(1);
        Self {
            idle: Arc::new(Mutex::new(Vec::with_capacity(size))),
            permits: Arc::new(Semaphore::new(size)),
            factory,
        }
    }

    /// Seed the pool with an engine that is already initialized.
    pub(crate) fn with_engine(self, engine: E) -> Self {
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(engine);
        }
        self
    }

    pub(crate) async fn checkout(&self) -> Result<EngineLease<E>> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| RutOcrError::Internal(format!("OCR engine pool closed: {e}")))?;

        let idle_engine = self.idle.lock().ok().and_then(|mut idle| idle.pop());
        let engine = match idle_engine {
            Some(engine) => engine,
            None => {
                let factory = Arc::clone(&self.factory);
                tokio::task::spawn_blocking(move || factory())
                    .await
                    .map_err(|e| {
                        RutOcrError::Internal(format!("OCR engine creation panicked: {e}"))
                    })?
                    .map_err(RutOcrError::OcrUnavailable)?
            }
        };

        Ok(EngineLease {
            engine: Some(engine),
            idle: Arc::clone(&self.idle),
            _permit: permit,
        })
    }
}

/// Exclusive use of one engine until dropped.
pub(crate) struct EngineLease<E> {
    engine: Option<E>,
    idle: Arc<Mutex<Vec<E>>>,
    _permit: OwnedSemaphorePermit,
}

impl<E: Send + 'static> EngineLease<E> {
    /// Run `job` on the blocking pool. The lease moves into the blocking
    /// task, so the engine stays checked out until `job` returns even if the
    /// caller stops waiting.
    pub(crate) async fn run<T, F>(self, job: F) -> Result<T>
    where
        F: FnOnce(&mut E) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let mut lease = self;
            let engine = lease
                .engine
                .as_mut()
                .ok_or_else(|| RutOcrError::Internal("OCR engine lease is empty".to_string()))?;
            job(engine)
        })
        .await
        .map_err(|e| RutOcrError::Recognition(format!("OCR task panicked: {e}")))?
    }
}

impl<E> Drop for EngineLease<E> {
    fn drop(&mut self) {
        // An engine that was mid-call during a panic is not trusted again.
        if std::thread::panicking() {
            return;
        }
        if let (Some(engine), Ok(mut idle)) = (self.engine.take(), self.idle.lock()) {
            idle.push(engine);
        }
    }
}
