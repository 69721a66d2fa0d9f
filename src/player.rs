//! External player control: process lifecycle and the JSON IPC channel.
//!
//! `session::PlayerSession` owns the player process and turns playback
//! intents into `ipc::IpcCommand` frames written to a `channel::CommandChannel`.

mod channel;
mod ipc;
mod session;
mod types;

#[cfg(test)]
pub(crate) use channel::CommandChannel;
pub use session::PlayerSession;
pub use types::{PlaybackMode, PlaybackState};
