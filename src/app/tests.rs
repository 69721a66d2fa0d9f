use super::*;
use crate::config::{PlayerSettings, Settings};
use crate::library::{Album, Library, Track, UNKNOWN_ARTIST};
use crate::player::{CommandChannel, PlaybackMode, PlayerSession};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Frames(Arc<Mutex<Vec<String>>>);

impl Frames {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl CommandChannel for Frames {
    fn is_connected(&self) -> bool {
        true
    }

    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.0
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(frame).trim_end().to_string());
        Ok(())
    }

    fn close(&mut self) {}
}

fn album(artist: &str, name: &str, titles: &[&str]) -> Arc<Album> {
    let path = PathBuf::from(format!("/music/{artist} - {name}"));
    let tracks = titles
        .iter()
        .enumerate()
        .map(|(i, title)| Track {
            path: path.join(format!("{:02} - {title}.mp3", i + 1)),
            title: title.to_string(),
            artist: UNKNOWN_ARTIST.to_string(),
            album: name.to_string(),
            track_number: i as u32 + 1,
            duration: None,
        })
        .collect();
    Arc::new(Album {
        path,
        name: name.to_string(),
        artist: artist.to_string(),
        tracks,
    })
}

fn library() -> Library {
    Library::new(
        PathBuf::from("/music"),
        vec![
            album("Pink Floyd", "The Wall", &["In the Flesh", "Hey You", "Mother"]),
            album("Miles Davis", "Kind of Blue", &["So What", "Blue in Green"]),
            album("Boards of Canada", "Geogaddi", &["Music Is Math"]),
        ],
    )
}

fn controller() -> NavigationController {
    NavigationController::new(library(), &Settings::default())
}

fn idle_session() -> PlayerSession {
    PlayerSession::new(PlayerSettings::default())
}

fn live_session() -> (PlayerSession, Frames) {
    let frames = Frames::default();
    let session = PlayerSession::attach(PlayerSettings::default(), Box::new(frames.clone()));
    (session, frames)
}

fn row_texts(model: &RenderModel) -> Vec<&str> {
    model.rows.iter().map(|r| r.text.as_str()).collect()
}

#[test]
fn starts_on_the_full_album_list() {
    let nav = controller();
    assert_eq!(nav.mode(), ViewMode::Albums);
    assert_eq!(nav.view().selected, 0);
    assert!(Arc::ptr_eq(&nav.view().albums, nav.library().albums()));
    // Boards of Canada, Miles Davis, Pink Floyd
    assert_eq!(nav.view().albums[0].name, "Geogaddi");
}

#[test]
fn selection_clamps_without_wrapping() {
    let mut nav = controller();
    let mut session = idle_session();

    nav.handle(Intent::Up, &mut session);
    assert_eq!(nav.view().selected, 0);

    for _ in 0..5 {
        nav.handle(Intent::Down, &mut session);
    }
    assert_eq!(nav.view().selected, 2);
}

#[test]
fn select_opens_tracks_and_back_returns() {
    let mut nav = controller();
    let mut session = idle_session();

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);
    assert_eq!(nav.mode(), ViewMode::Tracks);
    assert_eq!(nav.view().album.as_ref().unwrap().name, "The Wall");
    assert_eq!(nav.view().selected, 0);

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    assert_eq!(nav.view().selected, 2);

    nav.handle(Intent::Back, &mut session);
    assert_eq!(nav.mode(), ViewMode::Albums);
    assert!(nav.view().album.is_none());
    assert_eq!(nav.view().selected, 0);
}

#[test]
fn select_on_empty_library_stays_put() {
    let mut nav = NavigationController::new(
        Library::new(PathBuf::from("/music"), Vec::new()),
        &Settings::default(),
    );
    let mut session = idle_session();
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);
    assert_eq!(nav.mode(), ViewMode::Albums);
    assert_eq!(nav.view().selected, 0);
}

#[test]
fn search_narrows_and_cancel_restores() {
    let mut nav = controller();
    let mut session = idle_session();

    nav.handle(Intent::Search, &mut session);
    assert_eq!(nav.mode(), ViewMode::Search);
    assert_eq!(nav.view().albums.len(), 3);

    for c in "blue".chars() {
        nav.handle(Intent::Input(c), &mut session);
    }
    assert_eq!(nav.view().query, "blue");
    let names: Vec<_> = nav.view().albums.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Kind of Blue"]);

    nav.handle(Intent::Backspace, &mut session);
    assert_eq!(nav.view().query, "blu");

    nav.handle(Intent::Back, &mut session);
    assert_eq!(nav.mode(), ViewMode::Albums);
    assert!(Arc::ptr_eq(&nav.view().albums, nav.library().albums()));
    assert!(nav.view().query.is_empty());
}

#[test]
fn confirmed_search_keeps_the_filter() {
    let mut nav = controller();
    let mut session = idle_session();

    nav.handle(Intent::Search, &mut session);
    for c in "FLOYD".chars() {
        nav.handle(Intent::Input(c), &mut session);
    }
    nav.handle(Intent::Select, &mut session);
    assert_eq!(nav.mode(), ViewMode::Albums);
    assert_eq!(nav.view().albums.len(), 1);
    assert_eq!(nav.view().filter.as_deref(), Some("FLOYD"));

    // The filter survives a trip into the album and back.
    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Back, &mut session);
    assert_eq!(nav.view().albums.len(), 1);

    // Back on a filtered list drops the filter.
    nav.handle(Intent::Back, &mut session);
    assert_eq!(nav.view().albums.len(), 3);
    assert!(nav.view().filter.is_none());
}

#[test]
fn typing_outside_search_is_ignored() {
    let mut nav = controller();
    let mut session = idle_session();
    nav.handle(Intent::Input('x'), &mut session);
    nav.handle(Intent::Backspace, &mut session);
    assert!(nav.view().query.is_empty());
    assert_eq!(nav.view().albums.len(), 3);
}

#[test]
fn play_in_albums_mode_plays_the_selected_album() {
    let mut nav = controller();
    let (mut session, frames) = live_session();

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Play, &mut session);

    assert_eq!(session.state().mode, PlaybackMode::PlayingAlbum);
    assert_eq!(
        frames.take().last().map(String::as_str),
        Some(r#"{"command":["loadfile","/music/Miles Davis - Kind of Blue"]}"#)
    );
}

#[test]
fn select_in_tracks_mode_plays_that_track() {
    let mut nav = controller();
    let (mut session, frames) = live_session();

    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Select, &mut session);

    assert_eq!(session.state().mode, PlaybackMode::PlayingTrack);
    assert_eq!(session.state().index, Some(0));
    assert_eq!(
        frames.take(),
        vec![
            r#"{"command":["set","shuffle","no"]}"#.to_string(),
            r#"{"command":["playlist-clear"]}"#.to_string(),
            r#"{"command":["loadfile","/music/Boards of Canada - Geogaddi/01 - Music Is Math.mp3"]}"#
                .to_string(),
        ]
    );
}

#[test]
fn shuffle_is_only_accepted_on_the_album_list() {
    let mut nav = controller();
    let (mut session, _frames) = live_session();

    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Shuffle, &mut session);
    assert_eq!(session.state().mode, PlaybackMode::Stopped);

    nav.handle(Intent::Back, &mut session);
    nav.handle(Intent::Shuffle, &mut session);
    assert_eq!(session.state().mode, PlaybackMode::ShuffleAll);
}

#[test]
fn advance_moves_the_highlight_with_playback() {
    let mut nav = controller();
    let (mut session, _frames) = live_session();

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Select, &mut session);

    nav.handle(Intent::Advance, &mut session);
    assert_eq!(nav.view().selected, 1);
    nav.handle(Intent::Advance, &mut session);
    assert_eq!(nav.view().selected, 2);
    nav.handle(Intent::Advance, &mut session);
    assert_eq!(nav.view().selected, 2);
    assert_eq!(session.state().index, Some(2));
}

#[test]
fn volume_uses_the_configured_step() {
    let mut settings = Settings::default();
    settings.player.volume_step = 3;
    let mut nav = NavigationController::new(library(), &settings);
    let (mut session, frames) = live_session();

    nav.handle(Intent::VolumeUp, &mut session);
    nav.handle(Intent::VolumeDown, &mut session);
    assert_eq!(
        frames.take(),
        vec![
            r#"{"command":["add","volume","3"]}"#.to_string(),
            r#"{"command":["add","volume","-3"]}"#.to_string(),
        ]
    );
}

#[test]
fn replace_library_resets_the_view() {
    let mut nav = controller();
    let mut session = idle_session();
    nav.handle(Intent::Select, &mut session);

    let fresh = Library::new(
        PathBuf::from("/music"),
        vec![album("Autechre", "Amber", &["Foil"])],
    );
    nav.replace_library(fresh);

    assert_eq!(nav.mode(), ViewMode::Albums);
    assert_eq!(nav.view().albums.len(), 1);
    assert!(nav.view().album.is_none());
}

#[test]
fn render_marks_selection_and_playing_rows() {
    let mut nav = controller();
    let (mut session, _frames) = live_session();

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);

    let model = nav.render(&session);
    assert_eq!(model.header, "Album: Pink Floyd - The Wall");
    assert_eq!(
        row_texts(&model),
        vec!["01 - In the Flesh", "02 - Hey You", "03 - Mother"]
    );
    assert!(model.rows[1].selected && model.rows[1].playing);
    assert!(!model.rows[0].playing);
    assert_eq!(model.status, "Playing: 02 - Hey You (Pink Floyd - The Wall)");
    assert_eq!(model.query, None);

    nav.handle(Intent::Back, &mut session);
    let model = nav.render(&session);
    assert_eq!(model.header, "Albums");
    assert!(model.rows[2].playing);
    assert_eq!(model.rows[2].text, "Pink Floyd - The Wall [3 tracks]");
    assert_eq!(model.summary, "3 albums, 6 tracks");
}

#[test]
fn render_shows_query_only_while_searching() {
    let mut nav = controller();
    let mut session = idle_session();
    nav.handle(Intent::Search, &mut session);
    nav.handle(Intent::Input('m'), &mut session);

    let model = nav.render(&session);
    assert_eq!(model.query.as_deref(), Some("m"));
    assert_eq!(model.status, "Stopped");
}

#[test]
fn status_line_covers_each_mode() {
    let (mut session, _frames) = live_session();
    let a = album("Pink Floyd", "The Wall", &["In the Flesh"]);
    let lib = Library::new(PathBuf::from("/music"), vec![Arc::clone(&a)]);
    assert_eq!(render::status_line(session.state(), &lib), "Stopped");

    session.play_album(&a);
    assert_eq!(
        render::status_line(session.state(), &lib),
        "Playing album: Pink Floyd - The Wall [1 tracks]"
    );

    session.toggle_pause();
    assert_eq!(
        render::status_line(session.state(), &lib),
        "Paused album: Pink Floyd - The Wall [1 tracks]"
    );

    // Gone from the library: fall back to the started label.
    let empty = Library::new(PathBuf::from("/music"), Vec::new());
    assert_eq!(
        render::status_line(session.state(), &empty),
        "Paused album: 01 - In the Flesh"
    );

    session.play_shuffle_all(std::path::Path::new("/music"));
    assert_eq!(render::status_line(session.state(), &lib), "Playing: Shuffle Mode");
}

#[test]
fn playback_survives_a_reindex_of_the_same_tree() {
    let mut nav = controller();
    let (mut session, frames) = live_session();

    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Down, &mut session);
    nav.handle(Intent::Select, &mut session);
    nav.handle(Intent::Select, &mut session);
    frames.take();

    nav.replace_library(library());
    let model = nav.render(&session);
    assert!(model.rows[2].playing);
    assert_eq!(model.status, "Playing: 01 - In the Flesh (Pink Floyd - The Wall)");

    nav.handle(Intent::Advance, &mut session);
    assert_eq!(session.state().index, Some(1));
    assert_eq!(
        frames.take().last().map(String::as_str),
        Some(r#"{"command":["loadfile","/music/Pink Floyd - The Wall/02 - Hey You.mp3"]}"#)
    );
    assert_eq!(
        nav.render(&session).status,
        "Playing: 02 - Hey You (Pink Floyd - The Wall)"
    );
}

#[test]
fn window_keeps_the_selection_in_view() {
    assert_eq!(render::window(0, 40, 15, 10), (0, 15));
    assert_eq!(render::window(9, 40, 15, 10), (0, 15));
    assert_eq!(render::window(25, 40, 15, 10), (15, 30));
    assert_eq!(render::window(39, 40, 15, 10), (29, 40));
    assert_eq!(render::window(3, 5, 15, 10), (0, 5));
    assert_eq!(render::window(0, 0, 15, 10), (0, 0));
}

#[test]
fn render_windows_long_lists() {
    let albums = (0..30)
        .map(|i| album("Artist", &format!("Album {i:02}"), &["x"]))
        .collect();
    let mut nav = NavigationController::new(
        Library::new(PathBuf::from("/music"), albums),
        &Settings::default(),
    );
    let mut session = idle_session();
    for _ in 0..20 {
        nav.handle(Intent::Down, &mut session);
    }

    let model = nav.render(&session);
    assert_eq!(model.offset, 10);
    assert_eq!(model.rows.len(), 15);
    assert_eq!(model.total, 30);
    assert!(model.rows[10].selected);
    assert_eq!(model.rows[0].text, "Artist - Album 10 [1 tracks]");
}

#[test]
fn notice_is_carried_into_the_render_model() {
    let mut nav = controller();
    let session = idle_session();
    assert_eq!(nav.notice(), None);

    nav.set_notice("Playback unavailable");
    assert_eq!(nav.notice(), Some("Playback unavailable"));
    assert_eq!(
        nav.render(&session).notice.as_deref(),
        Some("Playback unavailable")
    );
}
