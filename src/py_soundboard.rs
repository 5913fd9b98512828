//! Python surface of the soundboard.
//!
//! The host UI renders the grid and forwards taps; the platform file picker and
//! orientation lock are passed in as Python callables.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::path::PathBuf;
use std::time::Instant;

use crate::audio_engine::AudioEngine;
use crate::soundboard::{
    DEFAULT_SOUNDS, FilePicker, NoOrientationLock, Orientation, OrientationError,
    OrientationLock, PAD_COUNT_OPTIONS, Pad, PickError, PickedFile, RowJustify, Soundboard,
    SoundboardConfig, SoundboardError, edit_panel_visible, pad_width_percent, row_justify,
};

fn to_py_err(err: SoundboardError) -> PyErr {
    match err {
        SoundboardError::UnknownPad(_)
        | SoundboardError::UnknownSound(_)
        | SoundboardError::InvalidPadCount(_)
        | SoundboardError::InvalidColor(_)
        | SoundboardError::InvalidConfig(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Picker backed by a Python callable returning `None`, a URI, or `(uri, name)`.
struct CallbackPicker<'a, 'py>(&'a Bound<'py, PyAny>);

impl FilePicker for CallbackPicker<'_, '_> {
    fn pick_audio(&mut self) -> Result<Option<PickedFile>, PickError> {
        let result = self
            .0
            .call0()
            .map_err(|e| PickError::Failed(e.to_string()))?;

        if result.is_none() {
            return Ok(None);
        }

        if let Ok((uri, name)) = result.extract::<(String, Option<String>)>() {
            return Ok(Some(PickedFile { uri, name }));
        }

        match result.extract::<String>() {
            Ok(uri) => Ok(Some(PickedFile { uri, name: None })),
            Err(_) => Err(PickError::Failed(
                "picker must return None, a URI or (uri, name)".to_string(),
            )),
        }
    }
}

struct CallbackOrientation<'a, 'py>(&'a Bound<'py, PyAny>);

impl OrientationLock for CallbackOrientation<'_, '_> {
    fn unlock(&mut self) -> Result<(), OrientationError> {
        self.0
            .call0()
            .map(|_| ())
            .map_err(|e| OrientationError(e.to_string()))
    }
}

fn pad_to_dict<'py>(
    py: Python<'py>,
    board: &Soundboard<AudioEngine>,
    pad: &Pad,
    now: Instant,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", pad.id)?;
    dict.set_item("name", &pad.name)?;
    dict.set_item("sound", pad.sound)?;
    dict.set_item("custom_sound", pad.custom_sound.as_deref())?;
    dict.set_item("color_index", pad.color.index())?;
    dict.set_item("color", board.pad_style_token(pad.id))?;
    let active = board.is_pad_active(pad.id);
    let rgb = if active {
        pad.color.active_rgb()
    } else {
        pad.color.rgb()
    };
    dict.set_item("rgb", rgb)?;
    dict.set_item("active", active)?;
    dict.set_item("scale", board.pad_scale_at(pad.id, now))?;
    dict.set_item("selected", board.selected_pad() == Some(pad.id))?;
    Ok(dict)
}

/// Soundboard playing through the default output device.
#[pyclass(name = "Soundboard", unsendable)]
pub struct PySoundboard {
    board: Soundboard<AudioEngine>,
}

#[pymethods]
impl PySoundboard {
    /// Create a soundboard; unset arguments fall back to `LEO_PAD_ASSET_DIR`,
    /// `LEO_PAD_COUNT` and then the built-in defaults.
    #[new]
    #[pyo3(signature = (asset_dir=None, pad_count=None, volume=None))]
    pub fn new(
        asset_dir: Option<String>,
        pad_count: Option<usize>,
        volume: Option<f32>,
    ) -> PyResult<Self> {
        let mut config = SoundboardConfig::from_env().map_err(to_py_err)?;
        if let Some(dir) = asset_dir {
            config.asset_dir = PathBuf::from(dir);
        }
        if let Some(count) = pad_count {
            config.initial_pad_count = count;
        }
        if let Some(volume) = volume {
            config.volume = volume;
        }
        config.validate().map_err(to_py_err)?;

        let mut engine = AudioEngine::new()
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to start audio engine: {e}")))?;
        engine
            .set_volume(config.volume)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let board = Soundboard::new(engine, config).map_err(to_py_err)?;
        Ok(Self { board })
    }

    /// Unlock orientation, configure the session and load the bundled sounds.
    ///
    /// Returns the number of bundled sounds that loaded.
    #[pyo3(signature = (unlock_orientation=None))]
    pub fn start(&mut self, unlock_orientation: Option<Bound<'_, PyAny>>) -> usize {
        match unlock_orientation.as_ref() {
            Some(callback) => self.board.start(&mut CallbackOrientation(callback)),
            None => self.board.start(&mut NoOrientationLock),
        }
    }

    pub fn press_pad(&mut self, pad_id: u32) {
        self.board.press_pad(pad_id);
    }

    pub fn play_pad(&mut self, pad_id: u32) -> bool {
        self.board.play_pad(pad_id)
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.board.toggle_edit_mode()
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.board.toggle_settings()
    }

    pub fn change_pad_sound(&mut self, pad_id: u32, sound_id: u32) -> PyResult<()> {
        self.board
            .change_pad_sound(pad_id, sound_id)
            .map_err(to_py_err)
    }

    /// Ask `picker` for an audio file and assign it to the pad.
    ///
    /// Returns False when the picker was cancelled.
    pub fn pick_custom_sound(&mut self, pad_id: u32, picker: Bound<'_, PyAny>) -> PyResult<bool> {
        self.board
            .pick_custom_sound(pad_id, &mut CallbackPicker(&picker))
            .map_err(to_py_err)
    }

    pub fn change_pad_color(&mut self, pad_id: u32, color_index: usize) -> PyResult<()> {
        self.board
            .change_pad_color(pad_id, color_index)
            .map_err(to_py_err)
    }

    pub fn remove_custom_sound(&mut self, pad_id: u32) -> PyResult<()> {
        self.board.remove_custom_sound(pad_id).map_err(to_py_err)
    }

    pub fn change_pad_count(&mut self, count: usize) -> PyResult<()> {
        self.board.change_pad_count(count).map_err(to_py_err)
    }

    /// Advance flashes and drain playback notifications; call once per UI frame.
    pub fn tick(&mut self) {
        self.board.poll_playback();
        self.board.refresh_active_pads();
    }

    #[getter]
    pub fn edit_mode(&self) -> bool {
        self.board.edit_mode()
    }

    #[getter]
    pub fn settings_visible(&self) -> bool {
        self.board.settings_visible()
    }

    #[getter]
    pub fn selected_pad(&self) -> Option<u32> {
        self.board.selected_pad()
    }

    #[getter]
    pub fn pad_count(&self) -> usize {
        self.board.pad_count()
    }

    /// Current pads as a list of dicts.
    pub fn pads(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let now = Instant::now();
        let list = PyList::empty(py);
        for pad in self.board.pads() {
            list.append(pad_to_dict(py, &self.board, pad, now)?)?;
        }
        Ok(list.into_any().unbind())
    }

    /// Grid geometry for a viewport of `width` x `height`.
    pub fn layout(&self, py: Python<'_>, width: f32, height: f32) -> PyResult<Py<PyAny>> {
        let orientation = Orientation::from_dimensions(width, height);
        let count = self.board.pad_count();

        let dict = PyDict::new(py);
        dict.set_item(
            "orientation",
            match orientation {
                Orientation::Portrait => "portrait",
                Orientation::Landscape => "landscape",
            },
        )?;
        dict.set_item("pad_width_percent", pad_width_percent(orientation, count))?;
        dict.set_item(
            "justify",
            match row_justify(orientation, count) {
                RowJustify::SpaceAround => "space-around",
                RowJustify::SpaceBetween => "space-between",
            },
        )?;
        dict.set_item(
            "edit_panel_visible",
            edit_panel_visible(orientation, self.board.edit_mode(), self.board.selected_pad()),
        )?;
        Ok(dict.into_any().unbind())
    }

    /// Bundled sounds as `(id, name)` pairs.
    #[staticmethod]
    pub fn default_sounds() -> Vec<(u32, &'static str)> {
        DEFAULT_SOUNDS.iter().map(|s| (s.id, s.name)).collect()
    }

    #[staticmethod]
    pub fn pad_count_options() -> Vec<usize> {
        PAD_COUNT_OPTIONS.to_vec()
    }

    /// Unload every clip. Custom sounds reload on their next press; bundled
    /// sounds come back with `start()`.
    pub fn shut_down(&mut self) {
        self.board.shutdown();
    }
}
