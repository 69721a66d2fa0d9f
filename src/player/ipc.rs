//! Wire format of the player control channel.
//!
//! Every command is one JSON object `{"command": [verb, args...]}` followed
//! by a newline. Responses are never read.

use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcCommand {
    SetShuffle(bool),
    PlaylistClear,
    /// Load a file, or a directory the player expands into its contents.
    LoadFile(PathBuf),
    PlaylistNext,
    CyclePause,
    AddVolume(i32),
    Stop,
}

#[derive(Serialize)]
struct Request<'a> {
    command: &'a [String],
}

impl IpcCommand {
    /// Verb followed by its arguments, as strings.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::SetShuffle(on) => vec![
                "set".into(),
                "shuffle".into(),
                if *on { "yes" } else { "no" }.into(),
            ],
            Self::PlaylistClear => vec!["playlist-clear".into()],
            Self::LoadFile(path) => vec!["loadfile".into(), path.to_string_lossy().into_owned()],
            Self::PlaylistNext => vec!["playlist-next".into()],
            Self::CyclePause => vec!["cycle".into(), "pause".into()],
            Self::AddVolume(delta) => vec!["add".into(), "volume".into(), delta.to_string()],
            Self::Stop => vec!["stop".into()],
        }
    }

    /// Serialize into one newline-terminated frame.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let args = self.args();
        let mut frame = serde_json::to_vec(&Request { command: &args })?;
        frame.push(b'\n');
        Ok(frame)
    }
}
