//! ImageSong CLI library.
//!
//! Input loading and the `encode`, `decode`, and `roundtrip` commands behind
//! the `imagesong` binary.

pub mod commands;
pub mod input;
