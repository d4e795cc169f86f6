//! Library scanning: turns a directory of audio files into `Track`s the
//! player can queue.

mod display;
mod scan;

pub use display::TrackText;
pub use scan::scan;
