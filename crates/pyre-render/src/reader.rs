// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// A dedicated thread reads stdin and sends byte chunks over a channel, so
// the key source can wait with `recv_timeout` and resolve a lone ESC
// after a short pause instead of blocking forever inside `read()`.
//
// Shutdown: the thread polls stdin with a short timeout and checks an
// `AtomicBool` between polls, so `stop` never waits on a blocked read.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

const READ_BUF_SIZE: usize = 4096;

/// How often the thread checks the stop flag.
const POLL_TIMEOUT_MS: i32 = 50;

/// Background stdin reader thread. Stops when dropped.
#[derive(Debug)]
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Start the reader thread.
    ///
    /// Each message is a non-empty chunk of raw bytes. The channel closes
    /// when the reader stops or stdin reaches EOF.
    ///
    /// # Errors
    ///
    /// The OS refused to spawn a thread.
    pub fn spawn() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || reader_loop(&tx, &stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
    let fd = libc::STDIN_FILENO;
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };
        if ready <= 0 {
            continue;
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        let Ok(n @ 1..) = usize::try_from(n) else {
            tracing::debug!("stdin closed");
            break;
        };
        if tx.send(buf[..n].to_vec()).is_err() {
            break;
        }
    }
}

/// Without `poll`, a stop request only lands after the next read returns.
#[cfg(not(unix))]
fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let stdin = io::stdin();
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match stdin.lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
