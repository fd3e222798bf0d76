use std::path::{Path, PathBuf};

use qlm_core::DataSink;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::SaveError;
use crate::retry::SaveClient;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveJob {
    pub filename: String,
    pub line: String,
}

/// Outcome counts for one session's save queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub delivered: usize,
    /// Written to the local buffer after retries ran out.
    pub buffered: usize,
    /// Neither delivered nor buffered.
    pub lost: usize,
}

/// Sending side of the queue. Cheap to clone; the worker stops once every
/// handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct SaveHandle {
    tx: mpsc::UnboundedSender<SaveJob>,
}

impl SaveHandle {
    /// Queues a line without waiting. Returns false if the worker is gone.
    pub fn enqueue(&self, filename: impl Into<String>, line: impl Into<String>) -> bool {
        self.tx
            .send(SaveJob {
                filename: filename.into(),
                line: line.into(),
            })
            .is_ok()
    }
}

impl DataSink for SaveHandle {
    fn append(&mut self, file: &str, line: String) {
        if !self.enqueue(file, line) {
            error!(file, "save queue closed, line dropped");
        }
    }
}

/// Local spill directory mirroring the remote layout: each job is appended
/// to `<dir>/<filename>`.
#[derive(Debug, Clone)]
pub struct LocalBuffer {
    dir: PathBuf,
}

impl LocalBuffer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn append(&self, job: &SaveJob) -> Result<PathBuf, SaveError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = Path::new(&job.filename)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("unnamed.csv"));
        let path = self.dir.join(name);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(job.line.as_bytes()).await?;
        file.flush().await?;
        Ok(path)
    }
}

/// Background worker delivering queued lines one at a time, in order.
pub struct SaveQueue {
    worker: JoinHandle<SaveReport>,
}

impl SaveQueue {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn<T>(client: SaveClient<T>, buffer: Option<LocalBuffer>) -> (SaveHandle, SaveQueue)
    where
        T: Transport + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(drain(client, buffer, rx));
        (SaveHandle { tx }, SaveQueue { worker })
    }

    /// Waits until every handle is dropped and all queued lines are handled.
    pub async fn finish(self) -> Result<SaveReport, SaveError> {
        Ok(self.worker.await?)
    }
}

async fn drain<T: Transport>(
    client: SaveClient<T>,
    buffer: Option<LocalBuffer>,
    mut rx: mpsc::UnboundedReceiver<SaveJob>,
) -> SaveReport {
    let mut report = SaveReport::default();

    while let Some(job) = rx.recv().await {
        let err = match client.save(&job.filename, &job.line).await {
            Ok(()) => {
                report.delivered += 1;
                continue;
            }
            Err(err) => err,
        };
        error!(file = %job.filename, error = %err, "giving up on remote save");

        let Some(buffer) = &buffer else {
            report.lost += 1;
            continue;
        };
        match buffer.append(&job).await {
            Ok(path) => {
                warn!(path = %path.display(), "line kept in local buffer");
                report.buffered += 1;
            }
            Err(err) => {
                error!(error = %err, "local buffer failed, line lost");
                report.lost += 1;
            }
        }
    }

    info!(
        delivered = report.delivered,
        buffered = report.buffered,
        lost = report.lost,
        "save queue drained"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::transport::mock::{MockOutcome, MockTransport};
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn delivers_in_enqueue_order() {
        let transport = MockTransport::new([]);
        let client = SaveClient::with_policy(transport.clone(), fast_policy());
        let (mut handle, queue) = SaveQueue::spawn(client, None);

        for i in 0..5 {
            handle.append("qlm_data.csv", format!("line {i}\n"));
        }
        drop(handle);

        let report = queue.finish().await.unwrap();
        assert_eq!(report.delivered, 5);
        let lines: Vec<_> = transport
            .attempts()
            .into_iter()
            .map(|(_, p)| p.filedata)
            .collect();
        assert_eq!(lines, ["line 0\n", "line 1\n", "line 2\n", "line 3\n", "line 4\n"]);
    }

    #[tokio::test]
    async fn exhausted_lines_go_to_local_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let transport = MockTransport::new([
            MockOutcome::Ok,
            MockOutcome::Status(500),
            MockOutcome::Status(500),
            MockOutcome::Status(500),
            MockOutcome::Ok,
        ]);
        let client = SaveClient::with_policy(transport.clone(), fast_policy());
        let (handle, queue) = SaveQueue::spawn(client, Some(LocalBuffer::new(dir.path())));

        assert!(handle.enqueue("qlm_data.csv", "first\n"));
        assert!(handle.enqueue("qlm_data.csv", "second\n"));
        assert!(handle.enqueue("qlm_data.csv", "third\n"));
        drop(handle);

        let report = queue.finish().await.unwrap();
        assert_eq!(
            report,
            SaveReport {
                delivered: 2,
                buffered: 1,
                lost: 0
            }
        );
        assert_eq!(transport.attempt_count(), 5);

        let buffered = std::fs::read_to_string(dir.path().join("qlm_data.csv")).unwrap();
        assert_eq!(buffered, "second\n");
    }

    #[tokio::test]
    async fn without_buffer_failures_are_counted_lost() {
        let transport = MockTransport::new([
            MockOutcome::Fail("down".into()),
            MockOutcome::Fail("down".into()),
            MockOutcome::Fail("down".into()),
        ]);
        let client = SaveClient::with_policy(transport, fast_policy());
        let (handle, queue) = SaveQueue::spawn(client, None);
        handle.enqueue("qlm_data.csv", "only\n");
        drop(handle);

        let report = queue.finish().await.unwrap();
        assert_eq!(report.lost, 1);
        assert_eq!(report.delivered, 0);
    }

    #[tokio::test]
    async fn buffer_strips_directories_from_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = LocalBuffer::new(dir.path());
        let path = buffer
            .append(&SaveJob {
                filename: "../../etc/evil.csv".into(),
                line: "x\n".into(),
            })
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("evil.csv"));
    }
}
