//! Image and frame-log writers.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use genart_core::error::EngineError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageFormat, RgbaImage};

use crate::animate::FrameLog;

fn io_err(path: &Path, e: impl std::fmt::Display) -> EngineError {
    EngineError::Io(format!("{}: {e}", path.display()))
}

/// Writes an image as PNG regardless of the path's extension.
///
/// Returns `EngineError::Io` on write failure.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<(), EngineError> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), width = img.width(), height = img.height(), "wrote png");
    Ok(())
}

/// Writes frames as a looping GIF, each shown for `delay_cs` hundredths of
/// a second.
///
/// Frames should already be reduced to at most 256 colors (see
/// [`crate::quantize`]); the encoder then keeps them exact.
pub fn write_gif(
    frames: impl IntoIterator<Item = RgbaImage>,
    delay_cs: u32,
    path: &Path,
) -> Result<(), EngineError> {
    let mut frames = frames.into_iter().peekable();
    if frames.peek().is_none() {
        return Err(EngineError::Animation("no frames to write".into()));
    }
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| io_err(path, e))?;
    let delay = Delay::from_numer_denom_ms(delay_cs * 10, 1);
    let mut count = 0usize;
    for img in frames {
        encoder
            .encode_frame(Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| io_err(path, e))?;
        count += 1;
    }
    tracing::info!(path = %path.display(), frames = count, delay_cs, "wrote gif");
    Ok(())
}

/// Writes per-frame parameters as pretty-printed JSON.
pub fn write_frame_log(logs: &[FrameLog], path: &Path) -> Result<(), EngineError> {
    let mut text =
        serde_json::to_string_pretty(logs).map_err(|e| EngineError::Io(e.to_string()))?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), frames = logs.len(), "wrote frame log");
    Ok(())
}

/// Frame-log location for an output path: same stem, `.json` extension.
pub fn frame_log_path(out: &Path) -> std::path::PathBuf {
    out.with_extension("json")
}
