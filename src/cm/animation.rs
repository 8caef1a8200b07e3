// Assembly of the daily frames into an animation.

use crate::cm::*;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use std::fs::File;
use std::io::BufWriter;

/// Display time of each day in the animation.
pub const FRAME_DURATION_MS: u32 = 200;

const FRAME_PREFIX: &str = "countermeasures_";
const FRAME_SUFFIX: &str = ".png";

/// Runs an external command to turn a figure into an image.
///
/// The command is split on whitespace, and `{input}` and `{output}` are replaced in each argument.
pub fn rasterize_frame(command: &str, input: &Path, output: &Path) -> CmResult<()> {
    let input_s = input.display().to_string();
    let output_s = output.display().to_string();
    let parts: Vec<String> = command
        .split_whitespace()
        .map(|s| s.replace("{input}", &input_s).replace("{output}", &output_s))
        .collect();
    let (program, rest) = match parts.split_first() {
        Some(x) => x,
        None => whatever!("Empty raster command"),
    };
    debug!("rasterize_frame: {} {:?}", program, rest);
    let status = std::process::Command::new(program)
        .args(rest)
        .status()
        .context(RasterCommandSnafu { command })?;
    if !status.success() {
        return Err(CmError::RasterFailed {
            command: command.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

/// The frames of a directory, in increasing order of the days.
pub fn collect_frames(dir: &Path) -> CmResult<Vec<PathBuf>> {
    let dir_s = dir.display().to_string();
    let entries = fs::read_dir(dir).context(OpeningFileSnafu { path: dir_s.clone() })?;
    let mut res: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.context(OpeningFileSnafu { path: dir_s.clone() })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(FRAME_PREFIX) && name.ends_with(FRAME_SUFFIX) {
            res.push(entry.path());
        }
    }
    // The dates are in the YYYY-MM-DD form: the order of the names is the order of the days.
    res.sort();
    if res.is_empty() {
        return Err(CmError::NoFrames { dir: dir_s });
    }
    Ok(res)
}

/// Writes an animated GIF from a list of images, looping forever.
pub fn assemble_gif(frames: &[PathBuf], out: &Path) -> CmResult<()> {
    let out_s = out.display().to_string();
    let file = File::create(out).context(WritingFileSnafu {
        path: out_s.clone(),
    })?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .context(ImageSnafu {
            path: out_s.clone(),
        })?;
    for p in frames {
        debug!("assemble_gif: adding {:?}", p);
        let img = image::open(p)
            .context(ImageSnafu {
                path: p.display().to_string(),
            })?
            .to_rgba8();
        let frame = Frame::from_parts(
            img,
            0,
            0,
            Delay::from_numer_denom_ms(FRAME_DURATION_MS, 1),
        );
        encoder.encode_frame(frame).context(ImageSnafu {
            path: out_s.clone(),
        })?;
    }
    Ok(())
}
