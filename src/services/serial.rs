/// Serial Service
/// Owns the single serial session: port lifecycle, send path, receive loop

use parking_lot::Mutex;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::models::TranscriptEntry;

/// Fixed read-poll timeout; doubles as the idle sleep between polls.
pub const READ_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Narrow seam over one open serial handle. The hardware implementation
/// wraps `serialport`; tests substitute an in-memory link.
pub trait SerialLink: Send {
    /// Number of bytes waiting in the receive buffer.
    fn bytes_to_read(&mut self) -> io::Result<u32>;

    /// Raw bytes up to (and excluding) the next `\n`. The link's read
    /// timeout bounds a partial line.
    fn read_line(&mut self) -> io::Result<Vec<u8>>;

    /// Write and flush.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Second handle onto the same device, for the reader thread.
    fn try_clone_link(&self) -> io::Result<Box<dyn SerialLink>>;
}

struct HardwareLink {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialLink for HardwareLink {
    fn bytes_to_read(&mut self) -> io::Result<u32> {
        self.port.bytes_to_read().map_err(io::Error::from)
    }

    fn read_line(&mut self) -> io::Result<Vec<u8>> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                // Timeout mid-line: hand back what arrived so far.
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e),
            }
        }
        Ok(line)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    fn try_clone_link(&self) -> io::Result<Box<dyn SerialLink>> {
        let port = self.port.try_clone().map_err(io::Error::from)?;
        Ok(Box::new(HardwareLink { port }))
    }
}

/// One active connection. The writer half stays here and is used from the
/// command side; the reader half lives on the reader thread.
struct SerialSession {
    port_name: String,
    baud_rate: u32,
    link: Box<dyn SerialLink>,
    running: Arc<AtomicBool>,
    reader_thread: Option<thread::JoinHandle<()>>,
}

/// Serial Manager - handles the session lifecycle
pub struct SerialManager {
    session: Mutex<Option<SerialSession>>,
}

impl SerialManager {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// Open `port_name` at `baud_rate` and start the receive loop.
    /// Received lines and read errors are delivered through `on_entry`
    /// from the reader thread; the caller forwards them to the UI queue.
    pub fn connect(
        &self,
        port_name: &str,
        baud_rate: u32,
        on_entry: impl Fn(TranscriptEntry) + Send + 'static,
    ) -> Result<(), String> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(READ_POLL_TIMEOUT)
            .open()
            .map_err(|e| e.to_string())?;
        self.attach(Box::new(HardwareLink { port }), port_name, baud_rate, on_entry)
    }

    fn attach(
        &self,
        link: Box<dyn SerialLink>,
        port_name: &str,
        baud_rate: u32,
        on_entry: impl Fn(TranscriptEntry) + Send + 'static,
    ) -> Result<(), String> {
        let mut session = self.session.lock();
        if let Some(ref s) = *session {
            return Err(format!("Already connected to {}", s.port_name));
        }

        let reader = link.try_clone_link().map_err(|e| e.to_string())?;
        let running = Arc::new(AtomicBool::new(true));

        let reader_thread = thread::spawn({
            let running = running.clone();
            move || receive_loop(reader, running, on_entry)
        });

        log::info!("Connected to {} at {} baud", port_name, baud_rate);

        *session = Some(SerialSession {
            port_name: port_name.to_string(),
            baud_rate,
            link,
            running,
            reader_thread: Some(reader_thread),
        });

        Ok(())
    }

    /// Write `text` plus a newline terminator. Empty input or no open
    /// session is a silent no-op (`Ok(None)`); a successful write returns
    /// the `Sent` entry for the transcript.
    pub fn send(&self, text: &str) -> Result<Option<TranscriptEntry>, String> {
        if text.is_empty() {
            return Ok(None);
        }
        let mut session = self.session.lock();
        let s = match session.as_mut() {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut data = text.as_bytes().to_vec();
        data.push(b'\n');
        s.link.write_all(&data).map_err(|e| e.to_string())?;

        Ok(Some(TranscriptEntry::sent(text)))
    }

    /// Stop the receive loop and close the port. The stop is cooperative:
    /// the loop observes the flag at the top of its next iteration, so at
    /// most one more poll happens after this call. Idempotent.
    pub fn disconnect(&self) {
        let mut session = self.session.lock();
        if let Some(mut s) = session.take() {
            s.running.store(false, Ordering::Relaxed);
            if let Some(handle) = s.reader_thread.take() {
                let _ = handle.join();
            }
            log::info!("Disconnected from {} ({} baud)", s.port_name, s.baud_rate);
            // Dropping the session closes the port handle.
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.lock().is_some()
    }
}

impl Default for SerialManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll the reader half until the running flag drops. Malformed byte
/// sequences and blank lines are discarded; read failures are reported
/// and polling continues.
fn receive_loop(
    mut link: Box<dyn SerialLink>,
    running: Arc<AtomicBool>,
    on_entry: impl Fn(TranscriptEntry),
) {
    while running.load(Ordering::Relaxed) {
        let pending = match link.bytes_to_read() {
            Ok(n) => n,
            Err(e) => {
                on_entry(TranscriptEntry::error(format!("Error receiving: {}", e)));
                thread::sleep(READ_POLL_TIMEOUT);
                continue;
            }
        };
        if pending == 0 {
            thread::sleep(READ_POLL_TIMEOUT);
            continue;
        }

        match link.read_line() {
            Ok(raw) => {
                if let Ok(text) = String::from_utf8(raw) {
                    let text = text.trim();
                    if !text.is_empty() {
                        on_entry(TranscriptEntry::received(text));
                    }
                }
            }
            Err(e) => on_entry(TranscriptEntry::error(format!("Error receiving: {}", e))),
        }
    }
}
