//! Background generation engine.
//!
//! A bounded mpsc queue feeding a fixed pool of Tokio worker tasks. Each
//! worker runs one generation end to end: submit the prompt to Replicate,
//! poll to completion, download the output, re-encode it as PNG at
//! `<folder>/<id>.png`, and record the terminal status on the row.
//!
//! The queue bound is the backpressure mechanism: `submit` never blocks
//! the request path, and a full queue fails the generation immediately
//! instead of letting it pend forever.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use magicgen_core::generation::{self, GenId};
use magicgen_db::repositories::GenerationRepo;
use magicgen_db::DbPool;
use magicgen_replicate::ReplicateClient;

/// One unit of work: generate the image for a persisted record.
///
/// The record is always inserted before its job is enqueued, so a worker
/// can assume the row exists.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: GenId,
    pub prompt: String,
    pub folder: String,
}

/// Why a job could not be enqueued.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("generation queue is full")]
    QueueFull,

    #[error("generation engine is shut down")]
    ShutDown,
}

type SharedReceiver = Arc<Mutex<mpsc::Receiver<GenerationJob>>>;

/// Handle to the worker pool. Cheap to share via `Arc`.
pub struct GenerationEngine {
    tx: mpsc::Sender<GenerationJob>,
    // Kept alive so the channel stays open even with zero workers
    // (used by tests to freeze jobs in the queue).
    _rx: SharedReceiver,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl GenerationEngine {
    /// Spawn `worker_count` workers consuming a queue of `queue_capacity`.
    pub fn start(
        pool: DbPool,
        client: Arc<ReplicateClient>,
        worker_count: usize,
        queue_capacity: usize,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let rx: SharedReceiver = Arc::new(Mutex::new(rx));
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        for worker_id in 0..worker_count {
            tracker.spawn(worker_loop(
                worker_id,
                pool.clone(),
                Arc::clone(&client),
                Arc::clone(&rx),
                cancel.clone(),
            ));
        }
        tracker.close();

        tracing::info!(worker_count, queue_capacity, "Generation engine started");

        Arc::new(Self {
            tx,
            _rx: rx,
            cancel,
            tracker,
        })
    }

    /// Enqueue a job without blocking the request path.
    pub fn submit(&self, job: GenerationJob) -> Result<(), SubmitError> {
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SubmitError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SubmitError::ShutDown,
        })
    }

    /// Stop the workers and wait for in-flight generations to finish.
    ///
    /// Queued-but-unstarted jobs are abandoned; their rows stay `pending`
    /// and flip to ready if the image later appears, which it will not
    /// after shutdown. This matches the no-cancellation contract: work
    /// already dispatched to a worker is never aborted mid-flight.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.wait().await;
        tracing::info!("Generation engine shut down");
    }
}

/// A single worker: pull jobs until cancelled, record the outcome of each.
async fn worker_loop(
    worker_id: usize,
    pool: DbPool,
    client: Arc<ReplicateClient>,
    rx: SharedReceiver,
    cancel: CancellationToken,
) {
    tracing::info!(worker_id, "Generation worker started");

    loop {
        let job = tokio::select! {
            _ = cancel.cancelled() => break,
            job = recv_job(&rx) => match job {
                Some(job) => job,
                None => break,
            },
        };

        let gen_id = job.id.clone();
        tracing::info!(worker_id, gen_id = %gen_id, "Generation claimed");

        match process_job(&client, job).await {
            Ok(()) => {
                if let Err(e) = GenerationRepo::mark_ready(&pool, &gen_id).await {
                    tracing::error!(gen_id = %gen_id, error = %e, "Failed to mark generation ready");
                } else {
                    tracing::info!(worker_id, gen_id = %gen_id, "Generation completed");
                }
            }
            Err(e) => {
                tracing::error!(worker_id, gen_id = %gen_id, error = %e, "Generation failed");
                if let Err(db_err) =
                    GenerationRepo::mark_failed(&pool, &gen_id, &e.to_string()).await
                {
                    tracing::error!(gen_id = %gen_id, error = %db_err, "Failed to mark generation failed");
                }
            }
        }
    }

    tracing::info!(worker_id, "Generation worker shutting down");
}

async fn recv_job(rx: &SharedReceiver) -> Option<GenerationJob> {
    rx.lock().await.recv().await
}

/// Run one generation: predict, download, re-encode as PNG, save.
async fn process_job(
    client: &ReplicateClient,
    job: GenerationJob,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let input = generation::model_input(&job.prompt);
    let url = client.generate_image_url(generation::MODEL, &input).await?;
    let bytes = client.fetch_image(&url).await?;

    // The model outputs webp; re-encode to PNG so the stored artifact
    // always matches `<folder>/<id>.png`. Decode + encode is CPU work,
    // so it goes on the blocking pool.
    let path = generation::image_path(&job.folder, &job.id);
    tokio::task::spawn_blocking(
        move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let img = image::load_from_memory(&bytes)?;
            img.save_with_format(&path, image::ImageFormat::Png)?;
            Ok(())
        },
    )
    .await??;

    Ok(())
}
