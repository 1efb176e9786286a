use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use chrono::Utc;
use log::{debug, warn};

use crate::store::TaskStore;

/// Handle shared between the ticker thread and presentation. The
/// mutex makes every store operation atomic with respect to the
/// recompute pass.
pub type SharedStore = Arc<Mutex<TaskStore>>;

pub fn shared(store: TaskStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Background driver for the periodic urgency recompute. Calls
/// `store.tick(now)` every `tick_interval` until stopped or dropped;
/// stopping never rolls back state a tick already applied.
pub struct Ticker {
    stop_tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start(store: SharedStore) -> Ticker {
        let interval = match store.lock() {
            Ok(store) => store.config().tick_interval,
            Err(poisoned) => poisoned.into_inner().config().tick_interval,
        };
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            debug!("ticker started, interval={:?}", interval);
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let Ok(mut store) = store.lock() else {
                            warn!("ticker stopping: store lock poisoned");
                            break;
                        };
                        store.tick(Utc::now());
                    }
                    // Stop requested, or the handle was leaked and the
                    // sender is gone.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("ticker stopped");
        });

        Ticker {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Halts future ticks and waits for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.stop_tx.send(());
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn fast_store(threshold_ms: i64, interval_ms: u64) -> SharedStore {
        shared(TaskStore::new(StoreConfig {
            urgent_threshold: ChronoDuration::milliseconds(threshold_ms),
            tick_interval: Duration::from_millis(interval_ms),
        }))
    }

    #[test]
    fn background_ticks_flag_stale_tasks() {
        let store = fast_store(20, 10);
        let id = store
            .lock()
            .unwrap()
            .add("age me", None, Utc::now())
            .unwrap();

        let ticker = Ticker::start(store.clone());
        thread::sleep(Duration::from_millis(100));
        ticker.stop();

        assert!(store.lock().unwrap().get(id).unwrap().is_urgent);
    }

    #[test]
    fn stop_halts_future_ticks() {
        let store = fast_store(30, 10);
        let id = store
            .lock()
            .unwrap()
            .add("never recomputed", None, Utc::now())
            .unwrap();

        // Stop before the first interval elapses, then outlive the
        // threshold. Without a tick the cached flag must stay false.
        let ticker = Ticker::start(store.clone());
        ticker.stop();
        thread::sleep(Duration::from_millis(80));

        assert!(!store.lock().unwrap().get(id).unwrap().is_urgent);
    }

    #[test]
    fn drop_behaves_like_stop() {
        let store = fast_store(30, 10);
        store.lock().unwrap().add("dropped", None, Utc::now());

        {
            let _ticker = Ticker::start(store.clone());
        }
        thread::sleep(Duration::from_millis(80));

        let guard = store.lock().unwrap();
        assert!(!guard.tasks()[0].is_urgent);
    }
}
