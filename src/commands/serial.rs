/// Serial Commands
/// Tauri commands for port enumeration and the serial session

use crate::models::{PortInfo, TranscriptEntry, BAUD_RATES};
use crate::services::SerialManager;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};

/// Event carrying one transcript entry to the webview.
pub const TRANSCRIPT_EVENT: &str = "serial-transcript";

/// List serial ports currently visible to the OS. Enumeration failure
/// yields an empty list rather than an error.
#[tauri::command]
pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .map(|ports| {
            ports
                .into_iter()
                .map(|p| PortInfo { name: p.port_name })
                .collect()
        })
        .unwrap_or_default()
}

/// Selectable baud rates.
#[tauri::command]
pub fn list_baud_rates() -> Vec<u32> {
    BAUD_RATES.to_vec()
}

/// Open the port and start receiving. Received lines and read errors
/// arrive as transcript events emitted from the reader thread.
#[tauri::command]
pub fn serial_connect(
    app: AppHandle,
    manager: State<'_, Arc<SerialManager>>,
    port_name: String,
    baud_rate: u32,
) -> Result<(), String> {
    manager.connect(&port_name, baud_rate, move |entry| {
        let _ = app.emit(TRANSCRIPT_EVENT, &entry);
    })
}

/// Write one line to the port. Emits the `Sent` entry on success and an
/// `Error sending` entry on write failure. Empty input or no open session
/// is a no-op.
#[tauri::command]
pub fn serial_send(
    app: AppHandle,
    manager: State<'_, Arc<SerialManager>>,
    text: String,
) -> Result<(), String> {
    match manager.send(&text) {
        Ok(Some(entry)) => {
            let _ = app.emit(TRANSCRIPT_EVENT, &entry);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(msg) => {
            let entry = TranscriptEntry::error(format!("Error sending: {}", msg));
            let _ = app.emit(TRANSCRIPT_EVENT, &entry);
            Err(msg)
        }
    }
}

/// Close the session. Safe to call when already disconnected.
#[tauri::command]
pub fn serial_disconnect(manager: State<'_, Arc<SerialManager>>) {
    manager.disconnect()
}

/// Check if a session is open.
#[tauri::command]
pub fn serial_is_connected(manager: State<'_, Arc<SerialManager>>) -> bool {
    manager.is_connected()
}
