use std::path::{Path, PathBuf};

use image::RgbaImage;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tree_core::music::LoopingTrack;

const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "JPG", "jpeg", "png", "PNG"];
// Neutral texel for photos that fail to load
const BLANK_TEXEL: [u8; 4] = [40, 40, 40, 255];
// Larger photos are downscaled to stay inside default GPU texture limits
pub const MAX_PHOTO_EDGE: u32 = 1024;

/// Candidate file names for photo `index` (0-based), e.g. `photo_01.jpg`.
pub fn photo_candidates(dir: &Path, index: usize) -> Vec<PathBuf> {
    PHOTO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("photo_{:02}.{ext}", index + 1)))
        .collect()
}

/// Decoded photo, or a 1x1 blank when nothing usable exists.
pub struct PhotoImage {
    pub image: RgbaImage,
    pub blank: bool,
}

pub fn blank_photo() -> PhotoImage {
    PhotoImage {
        image: RgbaImage::from_pixel(1, 1, image::Rgba(BLANK_TEXEL)),
        blank: true,
    }
}

pub fn load_photo(dir: &Path, index: usize) -> PhotoImage {
    for path in photo_candidates(dir, index) {
        if !path.exists() {
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                let img = if img.width() > MAX_PHOTO_EDGE || img.height() > MAX_PHOTO_EDGE {
                    img.thumbnail(MAX_PHOTO_EDGE, MAX_PHOTO_EDGE)
                } else {
                    img
                };
                return PhotoImage {
                    image: img.to_rgba8(),
                    blank: false,
                };
            }
            Err(e) => log::warn!("[assets] {}: {e}", path.display()),
        }
    }
    log::warn!(
        "[assets] no photo {} in {}; using a blank material",
        index + 1,
        dir.display()
    );
    blank_photo()
}

/// Decode a whole audio file into a mono loop at its native sample rate.
pub fn load_track(path: &Path) -> anyhow::Result<LoopingTrack> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow::anyhow!("no audio track"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| anyhow::anyhow!("unknown sample rate"))?;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // a corrupt packet costs a few milliseconds, not the track
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("[assets] {}: skipped packet: {e}", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend(
            buf.samples()
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    }
    LoopingTrack::new(samples, sample_rate).ok_or_else(|| anyhow::anyhow!("track is empty"))
}
