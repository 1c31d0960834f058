//! Boot image loader.
//!
//! Reads a raw binary image from disk, or falls back to a small built-in
//! program when none is supplied. The built-in program exercises the basic
//! store/load path and ends the simulation with a clean exit code.

use std::fs;
use std::io;
use std::path::Path;

/// The built-in fallback program, word order.
///
/// `auipc t0,0` / `sb zero,16(t0)` / `lbu a0,16(t0)` / `ebreak`, followed by
/// one word of data the store lands in.
pub const FALLBACK_IMAGE: [u32; 5] = [
    0x0000_0297, // auipc t0,0
    0x0002_8823, // sb   zero,16(t0)
    0x0102_c503, // lbu  a0,16(t0)
    0x0010_0073, // ebreak
    0xdead_beef, // data
];

/// Returns the built-in fallback program as raw little-endian bytes.
pub fn builtin_image() -> Vec<u8> {
    FALLBACK_IMAGE.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Loads the boot image from `path`, or the built-in fallback when no path
/// is given. A supplied but unreadable path is an error; the caller decides
/// whether that is fatal.
pub fn load_image(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(path) => {
            let image = fs::read(path)?;
            tracing::info!(path = %path.display(), bytes = image.len(), "boot image loaded");
            Ok(image)
        }
        None => {
            tracing::info!("no boot image provided, using the built-in one");
            Ok(builtin_image())
        }
    }
}
