use std::io;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::config::PlayerSettings;
use crate::library::{Album, Library, Track};

use super::channel::{self, CommandChannel, SharedChannel};
use super::ipc::IpcCommand;
use super::types::{PlaybackMode, PlaybackState, SessionPhase};

const CONNECT_RETRY: Duration = Duration::from_millis(100);
const SHUFFLE_LABEL: &str = "Shuffle Mode";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not start `{binary}` (is it installed and on PATH?): {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },
    #[error("player exited during startup ({status})")]
    ProcessExited { status: ExitStatus },
    #[error("player IPC endpoint {endpoint} did not accept a connection within {timeout:?}")]
    ConnectTimeout { endpoint: String, timeout: Duration },
}

/// Owns the external player process and its control channel.
///
/// Intents are fire-and-forget: nothing is read back from the player, so
/// [`PlaybackState`] records what was last commanded. Unless the session is
/// [`SessionPhase::Ready`], every intent is a silent no-op.
///
/// The process and channel are released by [`PlayerSession::stop`] and, on
/// any other path out (including unwinding), by `Drop`.
pub struct PlayerSession {
    settings: PlayerSettings,
    phase: SessionPhase,
    channel: Option<SharedChannel>,
    process: Option<Child>,
    state: PlaybackState,
}

impl PlayerSession {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            settings,
            phase: SessionPhase::Uninitialized,
            channel: None,
            process: None,
            state: PlaybackState::default(),
        }
    }

    /// A ready session over an already connected channel, with no process to manage.
    #[cfg(test)]
    pub(crate) fn attach(settings: PlayerSettings, channel: Box<dyn CommandChannel>) -> Self {
        let mut session = Self::new(settings);
        session.channel = Some(Arc::new(Mutex::new(channel)));
        session.phase = SessionPhase::Ready;
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Spawn the player and connect to its IPC endpoint.
    ///
    /// On failure the session becomes [`SessionPhase::Degraded`]; the error is
    /// logged here once and returned for the caller to surface.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Uninitialized {
            return Ok(());
        }
        self.phase = SessionPhase::Starting;

        match self.bootstrap() {
            Ok((process, channel)) => {
                info!(endpoint = %self.settings.ipc_endpoint, "player ready");
                self.process = Some(process);
                self.channel = Some(Arc::new(Mutex::new(channel)));
                self.phase = SessionPhase::Ready;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "player unavailable, playback disabled");
                self.phase = SessionPhase::Degraded;
                Err(e)
            }
        }
    }

    fn bootstrap(&self) -> Result<(Child, Box<dyn CommandChannel>), SessionError> {
        let endpoint = &self.settings.ipc_endpoint;

        // A socket left behind by an earlier run would accept nothing.
        #[cfg(unix)]
        if let Err(e) = std::fs::remove_file(endpoint) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(endpoint = %endpoint, error = %e, "could not remove stale endpoint");
            }
        }

        let mut process = Command::new(&self.settings.binary)
            .arg("--no-video")
            .arg("--idle")
            .arg(format!("--input-ipc-server={endpoint}"))
            .args(&self.settings.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SessionError::Spawn {
                binary: self.settings.binary.clone(),
                source,
            })?;
        debug!(pid = process.id(), "player spawned");

        let timeout = Duration::from_millis(self.settings.connect_timeout_ms);
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(Some(status)) = process.try_wait() {
                return Err(SessionError::ProcessExited { status });
            }
            match channel::connect(endpoint) {
                Ok(channel) => return Ok((process, channel)),
                Err(e) if Instant::now() >= deadline => {
                    debug!(error = %e, "last connect attempt failed");
                    terminate(&mut process);
                    return Err(SessionError::ConnectTimeout {
                        endpoint: endpoint.clone(),
                        timeout,
                    });
                }
                Err(_) => thread::sleep(CONNECT_RETRY),
            }
        }
    }

    /// Play a single track of `album`.
    pub fn play_track(&mut self, track: &Track, album: &Album, index: usize) {
        if !self.accepts("play_track") {
            return;
        }
        self.send(&IpcCommand::SetShuffle(false));
        self.send(&IpcCommand::PlaylistClear);
        self.send(&IpcCommand::LoadFile(track.path.clone()));

        self.state = PlaybackState {
            mode: PlaybackMode::PlayingTrack,
            album: Some(album.path.clone()),
            index: Some(index),
            paused: false,
            now_playing: Some(track.display_name()),
        };
    }

    /// Play a whole album by handing its directory to the player.
    pub fn play_album(&mut self, album: &Album) {
        if !self.accepts("play_album") {
            return;
        }
        let Some(first) = album.tracks.first() else {
            return;
        };
        self.send(&IpcCommand::SetShuffle(false));
        self.send(&IpcCommand::PlaylistClear);
        self.send(&IpcCommand::LoadFile(album.path.clone()));

        self.state = PlaybackState {
            mode: PlaybackMode::PlayingAlbum,
            album: Some(album.path.clone()),
            index: Some(0),
            paused: false,
            now_playing: Some(first.display_name()),
        };
    }

    /// Shuffle the whole library.
    ///
    /// The state changes immediately; the commands go out on a detached
    /// thread and are never awaited.
    pub fn play_shuffle_all(&mut self, library_root: &Path) {
        if !self.accepts("play_shuffle_all") {
            return;
        }
        self.state = PlaybackState {
            mode: PlaybackMode::ShuffleAll,
            album: None,
            index: None,
            paused: false,
            now_playing: Some(SHUFFLE_LABEL.to_string()),
        };

        let Some(channel) = self.channel.clone() else {
            warn!("player channel missing, shuffle not dispatched");
            return;
        };
        let root = library_root.to_path_buf();
        let spawned = thread::Builder::new()
            .name("shuffle-dispatch".to_string())
            .spawn(move || {
                dispatch(&channel, &IpcCommand::SetShuffle(true));
                dispatch(&channel, &IpcCommand::LoadFile(root));
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not dispatch shuffle commands");
        }
    }

    /// Advance to the next track.
    ///
    /// In shuffle mode the player picks the next track. Otherwise the album
    /// is looked up in `library` by its directory, the next index is
    /// computed locally and played as a fresh track; at the last track of the
    /// album, or when the album is no longer indexed, nothing happens.
    /// Returns the new local index.
    pub fn next(&mut self, library: &Library) -> Option<usize> {
        if !self.accepts("next") {
            return None;
        }
        match self.state.mode {
            PlaybackMode::Stopped => None,
            PlaybackMode::ShuffleAll => {
                self.send(&IpcCommand::PlaylistNext);
                None
            }
            PlaybackMode::PlayingTrack | PlaybackMode::PlayingAlbum => {
                let album = Arc::clone(library.album(self.state.album.as_deref()?)?);
                let next = self.state.index? + 1;
                let track = album.tracks.get(next)?;
                self.play_track(track, &album, next);
                Some(next)
            }
        }
    }

    /// Toggle pause and flip the local flag without confirmation.
    pub fn toggle_pause(&mut self) {
        if !self.accepts("toggle_pause") {
            return;
        }
        self.send(&IpcCommand::CyclePause);
        self.state.paused = !self.state.paused;
    }

    /// Relative volume change; the player clamps the result.
    pub fn adjust_volume(&mut self, delta: i32) {
        if !self.accepts("adjust_volume") {
            return;
        }
        self.send(&IpcCommand::AddVolume(delta));
    }

    /// Stop playback and release the player.
    ///
    /// The channel is closed and the process terminated even when the stop
    /// command cannot be delivered.
    pub fn stop(&mut self) {
        if self.is_ready() {
            self.send(&IpcCommand::Stop);
        }
        self.state = PlaybackState::default();
        self.teardown();
        self.phase = SessionPhase::Closed;
    }

    fn accepts(&self, intent: &str) -> bool {
        let ready = self.is_ready();
        if !ready {
            trace!(intent, phase = ?self.phase, "player not ready, intent ignored");
        }
        ready
    }

    fn send(&self, command: &IpcCommand) {
        match &self.channel {
            Some(channel) => dispatch(channel, command),
            None => warn!(?command, "no player channel, command skipped"),
        }
    }

    fn teardown(&mut self) {
        if let Some(channel) = self.channel.take() {
            match channel.lock() {
                Ok(mut ch) => ch.close(),
                Err(poisoned) => poisoned.into_inner().close(),
            }
            debug!("player channel closed");
        }
        if let Some(mut process) = self.process.take() {
            terminate(&mut process);
        }
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Encode and write one command. Failures are logged, never returned.
fn dispatch(channel: &SharedChannel, command: &IpcCommand) {
    let frame = match command.encode() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(?command, error = %e, "could not encode player command");
            return;
        }
    };
    let Ok(mut ch) = channel.lock() else {
        warn!(?command, "player channel lock poisoned, command skipped");
        return;
    };
    if !ch.is_connected() {
        warn!(?command, "player channel disconnected, command skipped");
        return;
    }
    if let Err(e) = ch.send_frame(&frame) {
        warn!(?command, error = %e, "failed to send player command");
    }
}

fn terminate(process: &mut Child) {
    if let Err(e) = process.kill() {
        // InvalidInput means it already exited.
        if e.kind() != io::ErrorKind::InvalidInput {
            warn!(error = %e, "failed to kill player process");
        }
    }
    match process.wait() {
        Ok(status) => debug!(%status, "player process exited"),
        Err(e) => warn!(error = %e, "failed to reap player process"),
    }
}
