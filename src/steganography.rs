//! # File-Level Operations
//!
//! Hides and extracts images in WAV files, inspects capacity, fits images to a
//! budget, and compares images. Each operation reads its inputs, runs the core
//! codec from [`crate::processing`], writes its output, and returns a
//! serializable report.
//!
//! Outputs are written only after all processing has succeeded.

use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audio::WavFile;
use crate::error::Result;
use crate::processing::capacity::CapacityReport;
use crate::processing::compare::{compare, ComparisonResult};
use crate::processing::fit::{fit_image, FitResult};
use crate::processing::lsb::{LsbCodec, SizeMismatch};
use crate::processing::payload::ResampleFilter;
use crate::raster::{self, LoadedImage};

#[derive(Debug, Clone, Serialize)]
pub struct HideReport {
    pub image_size: (u32, u32),
    pub data_bytes: usize,
    pub capacity_usage: f64,
    pub output_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub image_size: (u32, u32),
    /// Byte count declared by the header.
    pub data_bytes: u32,
    pub output_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mismatch: Option<SizeMismatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResizeReport {
    #[serde(flatten)]
    pub fit: FitResult,
    pub output_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub first: ImageSummary,
    pub second: ImageSummary,
    #[serde(flatten)]
    pub result: ComparisonResult,
}

/// Where the byte budget for [`resize_image_for_audio`] comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeBudget {
    /// Capacity of this WAV file.
    Audio(PathBuf),
    /// An explicit payload byte count.
    Bytes(i64),
}

fn open_wav(path: &Path) -> Result<WavFile> {
    info!("Opening WAV file: {}", path.display());
    let wav = WavFile::open(path)?;

    info!(
        "WAV Info: {} channels, {} bytes/sample, {} Hz, {} frames",
        wav.spec.channels,
        wav.spec.sample_width,
        wav.spec.sample_rate,
        wav.frames()
    );
    info!("Total audio samples: {}", wav.samples.len());

    Ok(wav)
}

fn open_image(path: &Path) -> Result<LoadedImage> {
    info!("Opening image: {}", path.display());
    let loaded = raster::load_rgb(path)?;

    let (width, height) = loaded.payload.dimensions();
    info!("Image size: {}x{} pixels", width, height);
    info!("Image data size: {} bytes", loaded.payload.byte_len());

    Ok(loaded)
}

/// Hides the image at `image_path` inside `wav_path`, writing `output_path`.
///
/// # Errors
/// [`CapacityExceeded`](crate::StegError::CapacityExceeded) if the image does not
/// fit and `codec.auto_fit` is off, plus any I/O, WAV or image decoding error.
pub fn hide_image<P, Q, R>(
    wav_path: P,
    image_path: Q,
    output_path: R,
    codec: &LsbCodec,
) -> Result<HideReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let mut wav = open_wav(wav_path.as_ref())?;
    let image = open_image(image_path.as_ref())?.payload;

    info!("Embedding image data into audio samples...");
    let report = codec.embed_buffer(&mut wav.samples, image)?;
    info!("Capacity usage: {:.2}%", report.capacity_usage);

    let output_path = output_path.as_ref();
    info!("Writing output file: {}", output_path.display());
    wav.save(output_path)?;

    info!("Image successfully hidden in WAV file!");

    Ok(HideReport {
        image_size: report.image_size,
        data_bytes: report.data_bytes,
        capacity_usage: report.capacity_usage,
        output_file: output_path.to_path_buf(),
        fit: report.fit,
    })
}

/// Recovers the image hidden in `wav_path` and saves it to `output_path`.
///
/// The output format follows the file extension; use a lossless one (PNG, BMP)
/// to keep the pixels exact.
pub fn extract_image<P, Q>(wav_path: P, output_path: Q, codec: &LsbCodec) -> Result<ExtractReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let wav = open_wav(wav_path.as_ref())?;

    info!("Extracting header information...");
    let extracted = codec.extract_buffer(&wav.samples)?;
    let header = extracted.header;
    let size_mismatch = extracted.size_mismatch;

    info!("Extracted image dimensions: {}x{}", header.width, header.height);
    info!("Extracted image data size: {} bytes", header.data_size);

    info!("Reconstructing image...");
    let image = extracted.into_image()?;

    let output_path = output_path.as_ref();
    info!("Saving extracted image to: {}", output_path.display());
    raster::save_rgb(&image, output_path)?;

    info!("Image successfully extracted!");

    Ok(ExtractReport {
        image_size: (header.width, header.height),
        data_bytes: header.data_size,
        output_file: output_path.to_path_buf(),
        size_mismatch,
    })
}

/// Reports how much payload `wav_path` can carry.
pub fn audio_capacity<P: AsRef<Path>>(wav_path: P) -> Result<CapacityReport> {
    Ok(WavFile::open(wav_path)?.capacity())
}

/// Shrinks the image at `image_path` to fit `budget` and saves it to
/// `output_path`. An image that already fits is saved unchanged.
pub fn resize_image_for_audio<P, Q>(
    image_path: P,
    output_path: Q,
    budget: &ResizeBudget,
    filter: ResampleFilter,
) -> Result<ResizeReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let max_bytes = match budget {
        ResizeBudget::Audio(wav_path) => {
            let capacity = audio_capacity(wav_path)?;
            info!(
                "WAV file capacity: {} bytes ({:.1} KB)",
                capacity.capacity_bytes, capacity.capacity_kb
            );
            capacity.capacity_bytes
        }
        ResizeBudget::Bytes(max_bytes) => *max_bytes,
    };

    let image = open_image(image_path.as_ref())?.payload;
    let (resized, fit) = fit_image(&image, max_bytes, filter)?;
    let output_path = output_path.as_ref();

    if fit.resized {
        let (width, height) = fit.final_dims;
        info!("Resizing to: {}x{} pixels", width, height);
        info!(
            "New data size: {} bytes ({:.1} KB)",
            fit.final_bytes,
            fit.final_bytes as f64 / 1024.0
        );
        if let Some(reduction) = fit.reduction_percent {
            info!("Size reduction: {:.1}%", reduction);
        }
    } else {
        info!("Image already fits! Copying to {}", output_path.display());
    }

    raster::save_rgb(&resized, output_path)?;
    info!("Image saved to: {}", output_path.display());

    Ok(ResizeReport {
        fit,
        output_file: output_path.to_path_buf(),
    })
}

fn summarize(path: &Path, loaded: &LoadedImage) -> ImageSummary {
    let (width, height) = loaded.payload.dimensions();
    ImageSummary {
        path: path.to_path_buf(),
        width,
        height,
        color: format!("{:?}", loaded.source_color),
        file_size: loaded.file_size,
    }
}

/// Compares two image files pixel by pixel after converting both to RGB.
pub fn compare_images<P, Q>(first_path: P, second_path: Q) -> Result<CompareReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (first_path, second_path) = (first_path.as_ref(), second_path.as_ref());
    let first = raster::load_rgb(first_path)?;
    let second = raster::load_rgb(second_path)?;

    for (label, path, loaded) in [("Image 1", first_path, &first), ("Image 2", second_path, &second)] {
        let (width, height) = loaded.payload.dimensions();
        info!(
            "{}: {} ({}x{} pixels, {:?}, {} bytes)",
            label,
            path.display(),
            width,
            height,
            loaded.source_color,
            loaded.file_size
        );
    }

    let result = compare(&first.payload, &second.payload);

    Ok(CompareReport {
        first: summarize(first_path, &first),
        second: summarize(second_path, &second),
        result,
    })
}
