/// Serial Terminal application
/// Desktop serial (COM) port terminal with a Tauri backend
///
/// Module structure:
/// - commands: Tauri IPC handlers (frontend -> backend)
/// - services: Serial session lifecycle and receive loop
/// - models: Shared data types

mod commands;
mod models;
mod services;

use services::SerialManager;
use std::sync::Arc;
use tauri::RunEvent;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let serial_manager = Arc::new(SerialManager::new());
    let manager_for_shutdown = serial_manager.clone();

    tauri::Builder::default()
        .manage(serial_manager)
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::serial::list_ports,
            commands::serial::list_baud_rates,
            commands::serial::serial_connect,
            commands::serial::serial_send,
            commands::serial::serial_disconnect,
            commands::serial::serial_is_connected,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(move |_app_handle, event| {
            if let RunEvent::Exit = event {
                // Close the serial session on app exit
                log::info!("App shutting down - closing serial session");
                manager_for_shutdown.disconnect();
            }
        });
}
