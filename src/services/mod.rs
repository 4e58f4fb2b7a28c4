/// Services module
/// Serial session lifecycle and receive loop
/// Separated from commands module for better maintainability

pub mod serial;

pub use serial::SerialManager;
