//! Push channel adapter.
//!
//! Wraps a persistent connection to the backend's event stream: performs
//! the one-shot authorization handshake, then delivers parsed events to a
//! single handler, strictly in arrival order, until the channel is closed.
//! Closing is terminal; reconnection is the caller's responsibility.

use crate::error::{SyncError, SyncResult};
use ludex_protocol::{AuthFrame, PushEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// How often the pump re-checks the closed flag while the socket is idle.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A raw frame-oriented socket for the push channel.
///
/// This trait abstracts the wire, allowing different implementations
/// (a WebSocket client, a mock for testing, ...). The channel owns the
/// socket for its whole lifetime.
pub trait PushSocket: Send + 'static {
    /// Sends one outbound text frame.
    fn send(&mut self, frame: &str) -> Result<(), String>;

    /// Waits up to `timeout` for an inbound frame.
    ///
    /// Returns `Ok(Some(frame))` when a frame arrived, `Ok(None)` when the
    /// timeout elapsed with the connection still healthy, and `Err` when
    /// the connection is over.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, String>;

    /// Closes the connection.
    fn close(&mut self);
}

/// A live push channel.
///
/// Created by [`PushChannel::open`]; delivers events until [`close`]
/// (or drop). An idle connection with zero messages is fine - the pump
/// just waits.
///
/// [`close`]: PushChannel::close
pub struct PushChannel {
    closed: Arc<AtomicBool>,
    pump: Option<JoinHandle<()>>,
}

impl PushChannel {
    /// Opens the channel over `socket`.
    ///
    /// When `token` is set, the authorization frame is sent before any
    /// delivery starts; a handshake send failure aborts the open. The
    /// handler is invoked once per parsed event, in arrival order, from a
    /// single pump thread. Malformed frames are logged and skipped.
    /// Connection errors end delivery and are not retried.
    pub fn open<S, H>(mut socket: S, token: Option<&str>, handler: H) -> SyncResult<Self>
    where
        S: PushSocket,
        H: Fn(PushEvent) + Send + 'static,
    {
        if let Some(token) = token {
            let frame = AuthFrame::new(token).encode()?;
            socket
                .send(&frame)
                .map_err(|message| SyncError::Transport { message })?;
        }

        let closed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&closed);
        let pump = std::thread::spawn(move || {
            loop {
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                match socket.recv_timeout(POLL_INTERVAL) {
                    Ok(Some(frame)) => {
                        // Re-check: a close racing the recv must win.
                        if flag.load(Ordering::SeqCst) {
                            break;
                        }
                        match PushEvent::decode(&frame) {
                            Ok(event) => handler(event),
                            Err(error) => {
                                tracing::warn!(%error, "dropping malformed push frame");
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(message) => {
                        tracing::warn!(%message, "push connection ended");
                        break;
                    }
                }
            }
            socket.close();
        });

        Ok(Self {
            closed,
            pump: Some(pump),
        })
    }

    /// Closes the channel and waits for the pump to stop.
    ///
    /// No events are delivered after this returns. Closing twice is a
    /// no-op.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
    }

    /// Returns true once the channel has been closed or the connection
    /// ended.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
            || self.pump.as_ref().is_none_or(|pump| pump.is_finished())
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// A mock push socket for testing, fed by a [`MockPeer`].
#[derive(Debug)]
pub struct MockSocket {
    incoming: mpsc::Receiver<String>,
    sent: Arc<Mutex<Vec<String>>>,
    fail_sends: bool,
}

/// The far end of a [`MockSocket`]: injects frames and observes what the
/// client sent.
#[derive(Debug, Clone)]
pub struct MockPeer {
    outgoing: mpsc::Sender<String>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockSocket {
    /// Creates a connected socket/peer pair.
    pub fn pair() -> (Self, MockPeer) {
        let (tx, rx) = mpsc::channel();
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                incoming: rx,
                sent: Arc::clone(&sent),
                fail_sends: false,
            },
            MockPeer { outgoing: tx, sent },
        )
    }

    /// Makes every send fail, to exercise handshake failures.
    pub fn with_failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }
}

impl PushSocket for MockSocket {
    fn send(&mut self, frame: &str) -> Result<(), String> {
        if self.fail_sends {
            return Err("send failed".into());
        }
        self.sent.lock().unwrap().push(frame.to_string());
        Ok(())
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>, String> {
        match self.incoming.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err("connection closed".into()),
        }
    }

    fn close(&mut self) {}
}

impl MockPeer {
    /// Delivers one frame to the client.
    pub fn push_frame(&self, frame: &str) {
        let _ = self.outgoing.send(frame.to_string());
    }

    /// Delivers one event to the client.
    pub fn push_event(&self, event: &PushEvent) {
        if let Ok(frame) = event.encode() {
            self.push_frame(&frame);
        }
    }

    /// Returns every frame the client has sent so far.
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}
