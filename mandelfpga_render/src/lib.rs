use std::path::Path;
use std::process::Command;

use log::warn;

pub mod color;
pub mod frame;
pub mod plot;

pub use color::{color_for, Histogram, COLOR_TABLE};
pub use frame::{render_image, save_png};

fn viewer_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Hands `path` to the platform image viewer and waits for it to return.
pub fn open_image(path: &Path) {
    let viewer = viewer_command();

    match Command::new(viewer).arg(path).status() {
        Ok(status) if !status.success() => warn!("{} exited with {}", viewer, status),
        Ok(_) => {}
        Err(err) => warn!("could not run {}: {}", viewer, err),
    }
}
