//! Cancellable periodic progress poll.
//!
//! A `ProgressPoll` owns a ticker thread that sends [`SessionEvent::Tick`]
//! every interval. Dropping the poll stops the thread and waits for it, so no
//! tick is produced after the owner lets go of it.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::trace;

use crate::audio::SessionEvent;

pub struct ProgressPoll {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressPoll {
    pub fn start(interval: Duration, events: Sender<SessionEvent>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(SessionEvent::Tick).is_err() {
                            break;
                        }
                    }
                    // Explicit stop or the owner went away.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            trace!("progress poll stopped");
        });

        Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for ProgressPoll {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
