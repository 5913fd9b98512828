use pyo3::pymodule;

pub mod audio_engine;
mod messages;
mod py_soundboard;
pub mod soundboard;

/// The Python module implemented in Rust.
#[pymodule]
mod leo_pad_audio {
    #[pymodule_export]
    use super::py_soundboard::PySoundboard;
}
