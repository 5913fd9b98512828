//! Soundboard state.
//!
//! [`Soundboard`] owns the pads, the edit/settings UI state and the mapping from
//! pads to loaded clips. It drives three external services:
//!
//! - [`AudioBackend`]: loads, plays and unloads clips
//! - [`FilePicker`]: lets the user choose a custom sound
//! - [`OrientationLock`]: released once at start-up
//!
//! Every clip the board loads is recorded in its [`SoundBank`] and unloaded
//! exactly once: when it is replaced, when no pad references it any more, or
//! at shutdown.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::audio_engine::AudioError;

mod config;
mod errors;
mod layout;
mod library;
mod pad;
mod services;
mod sound_bank;

pub use config::{ASSET_DIR_ENV, PAD_COUNT_ENV, SoundboardConfig};
pub use errors::SoundboardError;
pub use layout::{
    Orientation, PRESS_FLASH, RowJustify, edit_panel_visible, pad_width_percent, press_scale,
    row_justify,
};
pub use library::{
    DEFAULT_PAD_COUNT, DEFAULT_SOUNDS, DefaultSound, PAD_COUNT_OPTIONS, PadColor, SoundId,
    default_color_for_pad, default_sound, default_sound_for_pad,
};
pub use pad::{CUSTOM_SOUND_FALLBACK_NAME, Pad, display_name_for_file};
pub use services::{
    AudioBackend, AudioSession, FilePicker, NoOrientationLock, OrientationError,
    OrientationLock, PickError, PickedFile, Playback, PlaybackEvent, SoundHandle,
};
pub use sound_bank::{SoundBank, SoundKey};

/// Turns a picker URI into a filesystem path.
fn path_for_uri(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

pub struct Soundboard<B: AudioBackend> {
    backend: B,
    config: SoundboardConfig,
    pads: Vec<Pad>,
    edit_mode: bool,
    selected_pad: Option<u32>,
    settings_visible: bool,
    /// Pads currently flashing, with the time of the press.
    pressed: HashMap<u32, Instant>,
    /// Run each pad last started, to match `Finished` events back to pads.
    playing: HashMap<u32, Playback>,
    bank: SoundBank,
}

impl<B: AudioBackend> Soundboard<B> {
    pub fn new(backend: B, config: SoundboardConfig) -> Result<Self, SoundboardError> {
        config.validate()?;

        let pads = (1..=config.initial_pad_count as u32).map(Pad::new).collect();
        Ok(Self {
            backend,
            config,
            pads,
            edit_mode: false,
            selected_pad: None,
            settings_visible: false,
            pressed: HashMap::new(),
            playing: HashMap::new(),
            bank: SoundBank::default(),
        })
    }

    /// Releases the orientation lock, configures the audio session and loads
    /// the bundled sounds.
    ///
    /// None of these steps is fatal: failures are logged and the board keeps
    /// working with whatever did load. Returns the number of bundled sounds
    /// that are playable.
    pub fn start(&mut self, orientation: &mut impl OrientationLock) -> usize {
        if let Err(e) = orientation.unlock() {
            log::warn!("{e}");
        }

        if let Err(e) = self.backend.configure_session(&self.config.session) {
            log::error!("failed to configure audio session: {e}");
        }

        self.load_default_sounds()
    }

    fn load_default_sounds(&mut self) -> usize {
        let mut loaded = 0;
        for sound in DEFAULT_SOUNDS.iter() {
            let path = self.config.asset_dir.join(sound.file);
            match self.backend.load(&path) {
                Ok(handle) => {
                    if let Some(old) = self.bank.insert(SoundKey::Default(sound.id), handle) {
                        self.unload_handle(old);
                    }
                    loaded += 1;
                }
                Err(e) => log::error!("failed to load sound {} ({}): {e}", sound.id, sound.name),
            }
        }

        log::info!("loaded {loaded}/{} default sounds", DEFAULT_SOUNDS.len());
        loaded
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn pad(&self, id: u32) -> Option<&Pad> {
        self.pads.iter().find(|p| p.id == id)
    }

    fn pad_mut(&mut self, id: u32) -> Result<&mut Pad, SoundboardError> {
        self.pads
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SoundboardError::UnknownPad(id))
    }

    pub fn pad_count(&self) -> usize {
        self.pads.len()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    pub fn settings_visible(&self) -> bool {
        self.settings_visible
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.settings_visible = !self.settings_visible;
        self.settings_visible
    }

    pub fn selected_pad(&self) -> Option<u32> {
        self.selected_pad
    }

    pub fn config(&self) -> &SoundboardConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Number of clips currently held by the backend on behalf of the board.
    pub fn loaded_sounds(&self) -> usize {
        self.bank.len()
    }

    pub fn is_loaded(&self, key: &SoundKey) -> bool {
        self.bank.contains(key)
    }

    /// A tap on a pad: selects it in edit mode, plays it otherwise.
    pub fn press_pad(&mut self, id: u32) {
        if self.edit_mode {
            if self.pad(id).is_some() {
                self.selected_pad = Some(id);
            }
        } else {
            self.play_pad(id);
        }
    }

    /// Plays the pad's clip from the start.
    ///
    /// A custom sound that has not been loaded yet is loaded now; if that
    /// fails the pad's bundled sound plays instead. Returns whether a clip was
    /// triggered.
    pub fn play_pad(&mut self, id: u32) -> bool {
        let Some(pad) = self.pad(id) else {
            return false;
        };
        let key = pad.sound_key();
        let fallback = pad.default_key();

        let handle = match (self.bank.get(&key), &key) {
            (Some(handle), _) => Some(handle),
            (None, SoundKey::Custom(uri)) => match self.load_custom(uri) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::error!("failed to load custom sound for pad {id}: {e}");
                    self.bank.get(&fallback)
                }
            },
            (None, SoundKey::Default(_)) => None,
        };

        let Some(handle) = handle else {
            log::warn!("pad {id} has no loaded sound ({key})");
            return false;
        };

        self.pressed.insert(id, Instant::now());

        let result = self
            .backend
            .stop(handle)
            .and_then(|()| self.backend.play(handle));
        match result {
            Ok(playback) => {
                self.playing.insert(id, playback);
            }
            Err(e) => {
                self.playing.remove(&id);
                log::error!("failed to play pad {id}: {e}");
            }
        }

        true
    }

    /// Loads (or reuses) the clip for a custom URI and records it in the bank.
    fn load_custom(&mut self, uri: &str) -> Result<SoundHandle, AudioError> {
        let key = SoundKey::Custom(uri.to_string());
        if let Some(handle) = self.bank.get(&key) {
            return Ok(handle);
        }

        let handle = self.backend.load(&path_for_uri(uri))?;
        if let Some(old) = self.bank.insert(key, handle) {
            self.unload_handle(old);
        }
        Ok(handle)
    }

    fn unload_handle(&mut self, handle: SoundHandle) {
        self.playing.retain(|_, p| p.handle != handle);
        if let Err(e) = self.backend.unload(handle) {
            log::warn!("failed to unload sound {handle}: {e}");
        }
    }

    /// Unloads the clip for `uri` unless a pad still points at it.
    fn release_custom_if_unused(&mut self, uri: &str) {
        if self
            .pads
            .iter()
            .any(|p| p.custom_sound.as_deref() == Some(uri))
        {
            return;
        }

        if let Some(handle) = self.bank.remove(&SoundKey::Custom(uri.to_string())) {
            log::debug!("unloading custom sound {uri}");
            self.unload_handle(handle);
        }
    }

    /// Assigns a bundled sound to a pad, dropping any custom sound.
    pub fn change_pad_sound(&mut self, id: u32, sound_id: SoundId) -> Result<(), SoundboardError> {
        if default_sound(sound_id).is_none() {
            return Err(SoundboardError::UnknownSound(sound_id));
        }

        let pad = self.pad_mut(id)?;
        let previous = pad.custom_sound.take();
        pad.assign_default(sound_id);

        if let Some(uri) = previous {
            self.release_custom_if_unused(&uri);
        }

        self.selected_pad = None;
        Ok(())
    }

    /// Lets the user pick an audio file for the pad and previews it.
    ///
    /// Returns `Ok(false)` when the picker was cancelled. When the file is
    /// assigned but fails to load, the pad keeps the file (playing it retries
    /// the load) and [`SoundboardError::CustomSoundLoad`] is returned so the
    /// host can tell the user.
    pub fn pick_custom_sound(
        &mut self,
        id: u32,
        picker: &mut impl FilePicker,
    ) -> Result<bool, SoundboardError> {
        self.pad_mut(id)?;

        let picked = picker.pick_audio().inspect_err(|e| {
            log::error!("{e}");
        })?;
        let Some(file) = picked else {
            log::info!("custom sound selection cancelled");
            return Ok(false);
        };

        let pad = self.pad_mut(id)?;
        let previous = pad.custom_sound.take();
        pad.assign_custom(file.uri.clone(), file.name.as_deref());

        if let Some(previous) = previous {
            self.release_custom_if_unused(&previous);
        }

        let loaded = self.load_custom(&file.uri);
        self.selected_pad = None;

        match loaded {
            Ok(handle) => {
                if let Err(e) = self.backend.play(handle) {
                    log::warn!("failed to preview {}: {e}", file.uri);
                }
                Ok(true)
            }
            Err(source) => {
                log::error!("failed to load custom sound {}: {source}", file.uri);
                Err(SoundboardError::CustomSoundLoad {
                    uri: file.uri,
                    source,
                })
            }
        }
    }

    pub fn change_pad_color(&mut self, id: u32, color_index: usize) -> Result<(), SoundboardError> {
        let color =
            PadColor::from_index(color_index).ok_or(SoundboardError::InvalidColor(color_index))?;
        self.pad_mut(id)?.color = color;
        Ok(())
    }

    /// Reverts a pad to the bundled sound for its grid position.
    pub fn remove_custom_sound(&mut self, id: u32) -> Result<(), SoundboardError> {
        let pad = self.pad_mut(id)?;
        let Some(uri) = pad.custom_sound.take() else {
            return Ok(());
        };
        pad.assign_default(default_sound_for_pad(id));

        self.release_custom_if_unused(&uri);
        Ok(())
    }

    /// Shows `count` pads, every one rebuilt with its positional defaults.
    ///
    /// Custom sounds of the old layout are unloaded.
    pub fn change_pad_count(&mut self, count: usize) -> Result<(), SoundboardError> {
        if !PAD_COUNT_OPTIONS.contains(&count) {
            return Err(SoundboardError::InvalidPadCount(count));
        }

        let current = self.pads.len();
        let fresh = (1..=count as u32).map(Pad::new).collect();
        let previous = std::mem::replace(&mut self.pads, fresh);
        for uri in previous.into_iter().filter_map(|p| p.custom_sound) {
            self.release_custom_if_unused(&uri);
        }

        let limit = count as u32;
        self.pressed.retain(|id, _| *id <= limit);
        self.playing.retain(|id, _| *id <= limit);
        if self.selected_pad.is_some_and(|id| id > limit) {
            self.selected_pad = None;
        }
        self.settings_visible = false;

        log::info!("pad count changed from {current} to {count}");
        Ok(())
    }

    /// Whether the pad is currently flashing.
    pub fn is_pad_active(&self, id: u32) -> bool {
        self.pressed.contains_key(&id)
    }

    /// Style token for the pad's current shade.
    pub fn pad_style_token(&self, id: u32) -> Option<&'static str> {
        let pad = self.pad(id)?;
        Some(if self.is_pad_active(id) {
            pad.color.active_token()
        } else {
            pad.color.token()
        })
    }

    /// Press-animation scale of the pad at `now`.
    pub fn pad_scale_at(&self, id: u32, now: Instant) -> f32 {
        self.pressed
            .get(&id)
            .map_or(1.0, |at| press_scale(now.saturating_duration_since(*at)))
    }

    /// Ends every flash that started at least [`PRESS_FLASH`] before `now`.
    pub fn refresh_active_pads_at(&mut self, now: Instant) {
        self.pressed
            .retain(|_, at| now.saturating_duration_since(*at) < PRESS_FLASH);
    }

    pub fn refresh_active_pads(&mut self) {
        self.refresh_active_pads_at(Instant::now());
    }

    /// Drains backend notifications; a finished clip ends its pads' flash.
    ///
    /// Only the end of a pad's latest run counts: a run that was restarted by
    /// a later press, or whose clip has been unloaded, is ignored.
    pub fn poll_playback(&mut self) {
        while let Some(event) = self.backend.poll_event() {
            match event {
                PlaybackEvent::Finished(playback) => {
                    let done: Vec<u32> = self
                        .playing
                        .iter()
                        .filter(|(_, p)| **p == playback)
                        .map(|(id, _)| *id)
                        .collect();
                    for id in done {
                        self.playing.remove(&id);
                        self.pressed.remove(&id);
                    }
                }
            }
        }
    }

    /// Unloads every clip the board holds.
    pub fn shutdown(&mut self) {
        let handles: Vec<_> = self.bank.drain().collect();
        if handles.is_empty() {
            return;
        }

        log::info!("unloading {} sounds", handles.len());
        if let Err(e) = self.backend.stop_all() {
            log::warn!("failed to stop playback: {e}");
        }
        for (_, handle) in handles {
            self.unload_handle(handle);
        }
        self.pressed.clear();
        self.playing.clear();
    }
}

impl<B: AudioBackend> Drop for Soundboard<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::audio_engine::SampleLoadError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Load(PathBuf),
        Play(SoundHandle),
        Stop(SoundHandle),
        StopAll,
        Unload(SoundHandle),
    }

    #[derive(Default)]
    struct MockBackend {
        next_slot: usize,
        next_trigger: u64,
        loaded: HashMap<SoundHandle, PathBuf>,
        failing: HashSet<PathBuf>,
        calls: Vec<Call>,
        events: VecDeque<PlaybackEvent>,
        session: Option<AudioSession>,
    }

    impl MockBackend {
        fn handle_for(&self, path: &str) -> Option<SoundHandle> {
            self.loaded
                .iter()
                .find(|(_, p)| p.as_path() == Path::new(path))
                .map(|(h, _)| *h)
        }

        fn played(&self) -> Vec<SoundHandle> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Play(h) => Some(*h),
                    _ => None,
                })
                .collect()
        }

        fn unloaded(&self) -> Vec<SoundHandle> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Unload(h) => Some(*h),
                    _ => None,
                })
                .collect()
        }

        fn check(&self, handle: SoundHandle) -> Result<(), AudioError> {
            if self.loaded.contains_key(&handle) {
                Ok(())
            } else {
                Err(AudioError::StaleHandle(handle))
            }
        }
    }

    impl AudioBackend for MockBackend {
        fn configure_session(&mut self, session: &AudioSession) -> Result<(), AudioError> {
            self.session = Some(*session);
            Ok(())
        }

        fn load(&mut self, path: &Path) -> Result<SoundHandle, AudioError> {
            self.calls.push(Call::Load(path.to_path_buf()));
            if self.failing.contains(path) {
                return Err(AudioError::Load {
                    path: path.display().to_string(),
                    source: SampleLoadError::Empty,
                });
            }
            let handle = SoundHandle::new(self.next_slot, 1);
            self.next_slot += 1;
            self.loaded.insert(handle, path.to_path_buf());
            Ok(handle)
        }

        fn play(&mut self, handle: SoundHandle) -> Result<Playback, AudioError> {
            self.check(handle)?;
            self.calls.push(Call::Play(handle));
            self.next_trigger += 1;
            Ok(Playback {
                handle,
                trigger: self.next_trigger,
            })
        }

        fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
            self.check(handle)?;
            self.calls.push(Call::Stop(handle));
            Ok(())
        }

        fn unload(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
            self.check(handle)?;
            self.loaded.remove(&handle);
            self.calls.push(Call::Unload(handle));
            Ok(())
        }

        fn stop_all(&mut self) -> Result<(), AudioError> {
            self.calls.push(Call::StopAll);
            Ok(())
        }

        fn poll_event(&mut self) -> Option<PlaybackEvent> {
            self.events.pop_front()
        }
    }

    struct ScriptedPicker(Option<Result<Option<PickedFile>, PickError>>);

    impl ScriptedPicker {
        fn file(uri: &str, name: &str) -> Self {
            Self(Some(Ok(Some(PickedFile {
                uri: uri.to_string(),
                name: Some(name.to_string()),
            }))))
        }

        fn cancelled() -> Self {
            Self(Some(Ok(None)))
        }
    }

    impl FilePicker for ScriptedPicker {
        fn pick_audio(&mut self) -> Result<Option<PickedFile>, PickError> {
            self.0.take().expect("picker used twice")
        }
    }

    struct FailingOrientation;

    impl OrientationLock for FailingOrientation {
        fn unlock(&mut self) -> Result<(), OrientationError> {
            Err(OrientationError("not supported".into()))
        }
    }

    const HORN: &str = "file:///cache/horn.mp3";
    const HORN_PATH: &str = "/cache/horn.mp3";
    const BELL: &str = "file:///cache/bell.mp3";

    fn asset(file: &str) -> PathBuf {
        PathBuf::from("assets/sounds").join(file)
    }

    fn started_board() -> Soundboard<MockBackend> {
        let mut board = Soundboard::new(MockBackend::default(), SoundboardConfig::default()).unwrap();
        board.start(&mut NoOrientationLock);
        board.backend_mut().calls.clear();
        board
    }

    fn default_handle(board: &Soundboard<MockBackend>, sound: SoundId) -> SoundHandle {
        board.bank.get(&SoundKey::Default(sound)).unwrap()
    }

    #[test]
    fn test_new_board_layout() {
        let board = Soundboard::new(MockBackend::default(), SoundboardConfig::default()).unwrap();

        assert_eq!(board.pad_count(), 16);
        assert_eq!(board.pads()[0].name, "Boos");
        assert_eq!(board.pads()[15].name, "TeTe");
        assert_eq!(board.pads()[8].color, PadColor::Purple);
        assert!(!board.edit_mode());
        assert_eq!(board.selected_pad(), None);
    }

    #[test]
    fn test_new_board_rejects_bad_pad_count() {
        let config = SoundboardConfig {
            initial_pad_count: 5,
            ..Default::default()
        };
        assert!(matches!(
            Soundboard::new(MockBackend::default(), config),
            Err(SoundboardError::InvalidPadCount(5))
        ));
    }

    #[test]
    fn test_start_loads_defaults_and_configures_session() {
        let mut board = Soundboard::new(MockBackend::default(), SoundboardConfig::default()).unwrap();

        let loaded = board.start(&mut FailingOrientation);

        assert_eq!(loaded, 16);
        assert_eq!(board.loaded_sounds(), 16);
        assert_eq!(board.backend().session, Some(AudioSession::default()));
        assert!(board.backend().calls.contains(&Call::Load(asset("mouse click.mp3"))));
    }

    #[test]
    fn test_missing_default_is_skipped() {
        let mut backend = MockBackend::default();
        backend.failing.insert(asset("Chutki.mp3"));
        let mut board = Soundboard::new(backend, SoundboardConfig::default()).unwrap();

        assert_eq!(board.start(&mut NoOrientationLock), 15);
        assert!(!board.is_loaded(&SoundKey::Default(3)));

        assert!(!board.play_pad(3));
        assert!(!board.is_pad_active(3));
        assert!(board.play_pad(4));
    }

    #[test]
    fn test_press_plays_from_start_and_flashes() {
        let mut board = started_board();
        let handle = default_handle(&board, 2);

        board.press_pad(2);

        assert_eq!(
            board.backend().calls,
            vec![Call::Stop(handle), Call::Play(handle)]
        );
        assert!(board.is_pad_active(2));
        assert_eq!(board.pad_style_token(2), Some("bg-yellow-200"));

        board.refresh_active_pads_at(Instant::now() + Duration::from_millis(250));
        assert!(!board.is_pad_active(2));
        assert_eq!(board.pad_style_token(2), Some("bg-yellow-300"));
    }

    #[test]
    fn test_press_scale_follows_flash() {
        let mut board = started_board();
        board.press_pad(1);

        let pressed_at = board.pressed[&1];
        assert!((board.pad_scale_at(1, pressed_at + Duration::from_millis(100)) - 0.9).abs() < 1e-6);
        assert!((board.pad_scale_at(2, pressed_at) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_press_in_edit_mode_selects() {
        let mut board = started_board();
        board.toggle_edit_mode();

        board.press_pad(5);
        board.press_pad(99);

        assert_eq!(board.selected_pad(), Some(5));
        assert!(board.backend().played().is_empty());
        assert!(!board.is_pad_active(5));
    }

    #[test]
    fn test_unknown_pad_is_ignored() {
        let mut board = started_board();
        assert!(!board.play_pad(42));
        assert!(board.backend().calls.is_empty());
    }

    #[test]
    fn test_finished_clip_ends_flash() {
        let mut board = started_board();
        board.press_pad(1);
        board.press_pad(2);
        let run = board.playing[&1];
        assert_eq!(run.handle, default_handle(&board, 1));

        board.backend_mut().events.push_back(PlaybackEvent::Finished(run));
        board.poll_playback();

        assert!(!board.is_pad_active(1));
        assert!(board.is_pad_active(2));
    }

    #[test]
    fn test_finish_of_restarted_run_keeps_flash() {
        let mut board = started_board();
        board.press_pad(1);
        let first = board.playing[&1];
        board.press_pad(1);
        let second = board.playing[&1];
        assert_eq!(first.handle, second.handle);
        assert_ne!(first, second);

        board.backend_mut().events.push_back(PlaybackEvent::Finished(first));
        board.poll_playback();
        assert!(board.is_pad_active(1));

        board.backend_mut().events.push_back(PlaybackEvent::Finished(second));
        board.poll_playback();
        assert!(!board.is_pad_active(1));
    }

    #[test]
    fn test_finish_of_unloaded_clip_is_ignored() {
        let mut board = started_board();
        board.pick_custom_sound(2, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        board.press_pad(2);
        let horn_run = board.playing[&2];
        board.change_pad_sound(2, 9).unwrap();
        assert!(!board.playing.contains_key(&2));

        board.press_pad(2);
        assert_eq!(board.playing[&2].handle, default_handle(&board, 9));

        board.backend_mut().events.push_back(PlaybackEvent::Finished(horn_run));
        board.poll_playback();

        assert!(board.is_pad_active(2));
    }

    #[test]
    fn test_stale_handle_on_play_still_flashes() {
        let mut board = started_board();
        let handle = default_handle(&board, 4);
        board.backend_mut().loaded.remove(&handle);

        assert!(board.play_pad(4));

        assert!(board.is_pad_active(4));
        assert!(!board.playing.contains_key(&4));
        assert!(board.backend().played().is_empty());
    }

    #[test]
    fn test_pick_custom_sound_assigns_and_previews() {
        let mut board = started_board();
        board.toggle_edit_mode();
        board.press_pad(1);

        let mut picker = ScriptedPicker::file(HORN, "air horn extended mix.mp3");
        assert!(board.pick_custom_sound(1, &mut picker).unwrap());

        let pad = board.pad(1).unwrap();
        assert_eq!(pad.custom_sound.as_deref(), Some(HORN));
        assert_eq!(pad.name, "air horn ext...");
        assert_eq!(board.selected_pad(), None);

        let handle = board.backend().handle_for(HORN_PATH).unwrap();
        assert_eq!(board.backend().played(), vec![handle]);
    }

    #[test]
    fn test_pick_cancelled_changes_nothing() {
        let mut board = started_board();
        board.toggle_edit_mode();
        board.press_pad(1);

        assert!(!board.pick_custom_sound(1, &mut ScriptedPicker::cancelled()).unwrap());

        assert!(!board.pad(1).unwrap().has_custom_sound());
        assert_eq!(board.selected_pad(), Some(1));
        assert!(board.backend().calls.is_empty());
    }

    #[test]
    fn test_picker_failure_is_reported() {
        let mut board = started_board();
        board.toggle_edit_mode();
        board.press_pad(1);
        let mut picker = ScriptedPicker(Some(Err(PickError::Failed("denied".into()))));

        let result = board.pick_custom_sound(1, &mut picker);

        assert!(matches!(result, Err(SoundboardError::Picker(_))));
        assert!(!board.pad(1).unwrap().has_custom_sound());
        assert_eq!(board.selected_pad(), Some(1));
    }

    #[test]
    fn test_pick_for_unknown_pad() {
        let mut board = started_board();
        let result = board.pick_custom_sound(30, &mut ScriptedPicker::cancelled());
        assert!(matches!(result, Err(SoundboardError::UnknownPad(30))));
    }

    #[test]
    fn test_failed_custom_load_is_retried_lazily() {
        let mut board = started_board();
        board.backend_mut().failing.insert(PathBuf::from(HORN_PATH));

        let result = board.pick_custom_sound(1, &mut ScriptedPicker::file(HORN, "horn.mp3"));
        assert!(matches!(result, Err(SoundboardError::CustomSoundLoad { .. })));
        assert_eq!(board.pad(1).unwrap().custom_sound.as_deref(), Some(HORN));

        board.backend_mut().failing.clear();
        board.backend_mut().calls.clear();
        assert!(board.play_pad(1));

        let handle = board.backend().handle_for(HORN_PATH).unwrap();
        assert_eq!(
            board.backend().calls,
            vec![
                Call::Load(PathBuf::from(HORN_PATH)),
                Call::Stop(handle),
                Call::Play(handle)
            ]
        );
    }

    #[test]
    fn test_lazy_load_failure_falls_back_to_default() {
        let mut board = started_board();
        board.backend_mut().failing.insert(PathBuf::from(HORN_PATH));
        let _ = board.pick_custom_sound(3, &mut ScriptedPicker::file(HORN, "horn.mp3"));
        board.backend_mut().calls.clear();

        assert!(board.play_pad(3));

        let fallback = default_handle(&board, 3);
        assert_eq!(board.backend().played(), vec![fallback]);
        assert!(!board.is_loaded(&SoundKey::Custom(HORN.into())));
    }

    #[test]
    fn test_repick_unloads_previous_custom_sound() {
        let mut board = started_board();
        board.pick_custom_sound(1, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        let horn = board.backend().handle_for(HORN_PATH).unwrap();

        board.pick_custom_sound(1, &mut ScriptedPicker::file(BELL, "bell.mp3")).unwrap();

        assert_eq!(board.backend().unloaded(), vec![horn]);
        assert!(!board.is_loaded(&SoundKey::Custom(HORN.into())));
        assert!(board.is_loaded(&SoundKey::Custom(BELL.into())));
        assert_eq!(board.loaded_sounds(), 17);
    }

    #[test]
    fn test_change_pad_sound_releases_custom() {
        let mut board = started_board();
        board.pick_custom_sound(2, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        let horn = board.backend().handle_for(HORN_PATH).unwrap();
        board.toggle_edit_mode();
        board.press_pad(2);

        board.change_pad_sound(2, 9).unwrap();

        let pad = board.pad(2).unwrap();
        assert!(pad.uses_default(9));
        assert_eq!(pad.name, "Ohoo");
        assert_eq!(board.selected_pad(), None);
        assert_eq!(board.backend().unloaded(), vec![horn]);
    }

    #[test]
    fn test_shared_custom_sound_survives_until_last_pad_releases() {
        let mut board = started_board();
        board.pick_custom_sound(1, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        board.pick_custom_sound(2, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        let horn = board.backend().handle_for(HORN_PATH).unwrap();

        // Picking the same file again reuses the loaded clip.
        let loads = board
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count();
        assert_eq!(loads, 1);

        board.remove_custom_sound(1).unwrap();
        assert!(board.backend().unloaded().is_empty());
        assert!(board.play_pad(2));
        assert_eq!(board.backend().played().last(), Some(&horn));

        board.remove_custom_sound(2).unwrap();
        assert_eq!(board.backend().unloaded(), vec![horn]);
    }

    #[test]
    fn test_change_pad_sound_rejects_unknown_ids() {
        let mut board = started_board();
        assert!(matches!(
            board.change_pad_sound(1, 17),
            Err(SoundboardError::UnknownSound(17))
        ));
        assert!(matches!(
            board.change_pad_sound(20, 1),
            Err(SoundboardError::UnknownPad(20))
        ));
    }

    #[test]
    fn test_remove_custom_sound_restores_positional_default() {
        let mut board = started_board();
        board.change_pad_sound(5, 12).unwrap();
        board.pick_custom_sound(5, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();

        board.remove_custom_sound(5).unwrap();

        let pad = board.pad(5).unwrap();
        assert!(pad.uses_default(5));
        assert_eq!(pad.name, "Crowd");
        assert!(!board.is_loaded(&SoundKey::Custom(HORN.into())));
    }

    #[test]
    fn test_remove_without_custom_sound_is_noop() {
        let mut board = started_board();
        board.change_pad_sound(5, 12).unwrap();

        board.remove_custom_sound(5).unwrap();

        assert!(board.pad(5).unwrap().uses_default(12));
        assert!(board.backend().calls.is_empty());
    }

    #[test]
    fn test_removed_custom_handle_is_never_played() {
        let mut board = started_board();
        board.pick_custom_sound(1, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        let horn = board.backend().handle_for(HORN_PATH).unwrap();
        board.remove_custom_sound(1).unwrap();
        board.backend_mut().calls.clear();

        board.press_pad(1);

        assert_eq!(board.backend().played(), vec![default_handle(&board, 1)]);
        assert!(!board.backend().played().contains(&horn));
    }

    #[test]
    fn test_change_pad_color() {
        let mut board = started_board();
        board.change_pad_color(1, 4).unwrap();

        assert_eq!(board.pad(1).unwrap().color, PadColor::Green);
        assert!(matches!(
            board.change_pad_color(1, 8),
            Err(SoundboardError::InvalidColor(8))
        ));
    }

    #[test]
    fn test_shrinking_pad_count_resets_pads_and_releases_custom_sounds() {
        let mut board = started_board();
        board.pick_custom_sound(2, &mut ScriptedPicker::file(BELL, "bell.mp3")).unwrap();
        board.pick_custom_sound(10, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        let bell = board.backend().handle_for("/cache/bell.mp3").unwrap();
        let horn = board.backend().handle_for(HORN_PATH).unwrap();
        board.toggle_edit_mode();
        board.press_pad(12);
        board.toggle_settings();

        board.change_pad_count(8).unwrap();

        assert_eq!(board.pad_count(), 8);
        let unloaded: HashSet<_> = board.backend().unloaded().into_iter().collect();
        assert_eq!(unloaded, HashSet::from([bell, horn]));
        assert!(!board.pad(2).unwrap().has_custom_sound());
        assert_eq!(board.loaded_sounds(), 16);
        assert_eq!(board.selected_pad(), None);
        assert!(!board.settings_visible());
    }

    #[test]
    fn test_pad_count_change_restores_positional_defaults() {
        let mut board = started_board();
        board.change_pad_color(1, 7).unwrap();
        board.change_pad_sound(2, 9).unwrap();

        board.change_pad_count(8).unwrap();

        assert_eq!(board.pad(1).unwrap().color, default_color_for_pad(1));
        let pad = board.pad(2).unwrap();
        assert!(pad.uses_default(2));
        assert_eq!(pad.name, "Charging");
    }

    #[test]
    fn test_growing_pad_count_appends_fresh_pads() {
        let config = SoundboardConfig {
            initial_pad_count: 4,
            ..Default::default()
        };
        let mut board = Soundboard::new(MockBackend::default(), config).unwrap();
        board.toggle_edit_mode();
        board.press_pad(3);

        board.change_pad_count(6).unwrap();

        assert_eq!(board.pad_count(), 6);
        assert_eq!(board.pad(6).unwrap().name, "Loading");
        assert_eq!(board.selected_pad(), Some(3));
        assert!(matches!(
            board.change_pad_count(12),
            Err(SoundboardError::InvalidPadCount(12))
        ));
    }

    #[test]
    fn test_shutdown_unloads_everything_once() {
        let mut board = started_board();
        board.pick_custom_sound(1, &mut ScriptedPicker::file(HORN, "horn.mp3")).unwrap();
        board.backend_mut().calls.clear();

        board.shutdown();
        assert_eq!(board.backend().calls.first(), Some(&Call::StopAll));
        assert_eq!(board.backend().unloaded().len(), 17);
        assert!(board.backend().loaded.is_empty());

        board.shutdown();
        assert_eq!(board.backend().unloaded().len(), 17);
    }

    #[test]
    fn test_path_for_uri() {
        assert_eq!(path_for_uri("file:///tmp/a.mp3"), PathBuf::from("/tmp/a.mp3"));
        assert_eq!(path_for_uri("/tmp/a.mp3"), PathBuf::from("/tmp/a.mp3"));
    }
}
