//! Transient refresh-rate and brightness overlays.

mod osd;
#[cfg(windows)]
mod window;

pub use osd::{osd_for_batch, OsdContent, OsdTimer, OSD_DURATION};
#[cfg(windows)]
pub use window::OsdWindow;
