// crates/clipscout-media/src/worker.rs
//
// MediaWorker: owns the result channel and the background threads that run
// probe and extraction work. All public API the presentation layer calls
// lives here; results come back as MediaResult values on `rx`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use clipscout_core::media_types::MediaResult;

use crate::extract::extract_frames;
use crate::probe::probe_media;
use crate::thumbnail::capture_thumbnail;

pub struct MediaWorker {
    /// Shared result channel: probe info, thumbnails, frame batches, errors.
    pub rx:   Receiver<MediaResult>,
    tx:       Sender<MediaResult>,
    shutdown: Arc<AtomicBool>,
    /// Limits concurrent probe threads: (active_count, Condvar).
    probe_sem: Arc<(Mutex<u32>, Condvar)>,
    /// Per-file extraction locks. A second extract for the same file waits
    /// for the first; different files run concurrently. Entries are never
    /// removed — the map is bounded by the number of files in a session.
    file_locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl Default for MediaWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaWorker {
    pub fn new() -> Self {
        let (tx, rx) = bounded(512);
        Self {
            rx,
            tx,
            shutdown:   Arc::new(AtomicBool::new(false)),
            probe_sem:  Arc::new((Mutex::new(0), Condvar::new())),
            file_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Stop accepting work. In-flight threads finish their current job and
    /// exit; their results may still arrive on `rx`.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Probe duration/dimensions and capture a preview thumbnail off-thread.
    ///
    /// A gatekeeper thread acquires the semaphore *before* spawning real
    /// work, so a bulk import holds at most PROBE_CONCURRENCY decoders open
    /// instead of one per queued file.
    pub fn probe_file(&self, id: Uuid, path: PathBuf) {
        let tx  = self.tx.clone();
        let sd  = self.shutdown.clone();
        let sem = self.probe_sem.clone();

        thread::spawn(move || {
            const PROBE_CONCURRENCY: u32 = 4;
            {
                let (lock, cvar) = &*sem;
                let mut count = lock.lock().unwrap();
                while *count >= PROBE_CONCURRENCY {
                    count = cvar.wait(count).unwrap();
                }
                *count += 1;
            }
            // RAII release guard — decrements count and wakes the next waiter.
            struct SemGuard(Arc<(Mutex<u32>, Condvar)>);
            impl Drop for SemGuard {
                fn drop(&mut self) {
                    let (lock, cvar) = &*self.0;
                    *lock.lock().unwrap() -= 1;
                    cvar.notify_one();
                }
            }
            let _guard = SemGuard(sem);

            if sd.load(Ordering::Relaxed) {
                return;
            }
            let info = match probe_media(&path) {
                Ok(info) => info,
                Err(e) => {
                    eprintln!("[worker] probe {}: {e}", path.display());
                    let _ = tx.send(MediaResult::Error { id, msg: e.to_string() });
                    return;
                }
            };
            let _ = tx.send(MediaResult::Info { id, info });

            if sd.load(Ordering::Relaxed) {
                return;
            }
            // Thumbnail a tenth of the way in — frame 0 is often black.
            let thumb_ts = if info.duration > 2.0 {
                (info.duration * 0.1).max(1.0)
            } else {
                0.0
            };
            match capture_thumbnail(&path, thumb_ts) {
                Ok(thumb) => {
                    let _ = tx.send(MediaResult::Thumbnail { id, thumb });
                }
                Err(e) => {
                    eprintln!("[worker] thumbnail {}: {e}", path.display());
                    let _ = tx.send(MediaResult::Error { id, msg: e.to_string() });
                }
            }
        });
    }

    /// Run a frame-extraction batch off-thread. The resulting FrameBatch
    /// echoes `id` and `timestamps` so the consumer can discard it when the
    /// selection has moved on — the pipeline itself never cancels.
    pub fn extract(&self, id: Uuid, path: PathBuf, timestamps: Vec<f64>) {
        let tx   = self.tx.clone();
        let sd   = self.shutdown.clone();
        let lock = self.file_lock(id);

        thread::spawn(move || {
            // Serialize per file: a concurrent batch against the same
            // decode source would interleave seeks.
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

            if sd.load(Ordering::Relaxed) {
                return;
            }
            match extract_frames(&path, &timestamps) {
                Ok(frames) => {
                    let _ = tx.send(MediaResult::FrameBatch { id, timestamps, frames });
                }
                Err(e) => {
                    eprintln!("[worker] extract {}: {e}", path.display());
                    let _ = tx.send(MediaResult::Error { id, msg: e.to_string() });
                }
            }
        });
    }

    fn file_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        self.file_locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(id)
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const RECV_WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn empty_batch_completes_without_touching_the_file() {
        let worker = MediaWorker::new();
        let id = Uuid::new_v4();
        // Nonexistent path: an empty batch must still succeed.
        worker.extract(id, PathBuf::from("/no/such/file.mp4"), Vec::new());

        match worker.rx.recv_timeout(RECV_WAIT).unwrap() {
            MediaResult::FrameBatch { id: got, timestamps, frames } => {
                assert_eq!(got, id);
                assert!(timestamps.is_empty());
                assert!(frames.is_empty());
            }
            _ => panic!("expected FrameBatch"),
        }
    }

    #[test]
    fn unopenable_file_reports_an_error_result() {
        ffmpeg_the_third::init().ok();
        let worker = MediaWorker::new();
        let id = Uuid::new_v4();
        worker.extract(id, PathBuf::from("/no/such/file.mp4"), vec![1.0]);

        match worker.rx.recv_timeout(RECV_WAIT).unwrap() {
            MediaResult::Error { id: got, msg } => {
                assert_eq!(got, id);
                assert!(!msg.is_empty());
            }
            _ => panic!("expected Error"),
        }
    }

    #[test]
    fn probe_failure_reports_an_error_result() {
        ffmpeg_the_third::init().ok();
        let worker = MediaWorker::new();
        let id = Uuid::new_v4();
        worker.probe_file(id, PathBuf::from("/no/such/file.mp4"));

        match worker.rx.recv_timeout(RECV_WAIT).unwrap() {
            MediaResult::Error { id: got, .. } => assert_eq!(got, id),
            _ => panic!("expected Error"),
        }
    }
}
