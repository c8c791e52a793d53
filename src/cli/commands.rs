//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::{info, warn};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::codec::{self, wav, FileType};
use crate::config::CodecConfig;
use crate::engine::buffer::WaveBuffer;
use crate::error::Result;

/// Transforms applied by `convert`, in order: channel change, then reverse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub mono: bool,
    pub stereo: bool,
    pub reverse: bool,
}

/// Print the detected container type of each file.
pub fn sniff(files: &[impl AsRef<Path>]) -> Result<()> {
    for file in files {
        let path = file.as_ref();
        let file_type = codec::sniff_file(path)?;
        println!("{}: {}", path.display(), file_type);
    }
    Ok(())
}

/// Walk a directory tree and classify every regular file.
///
/// Returns the number of files with a recognized container type.
pub fn scan(dir: &Path) -> Result<usize> {
    info!("Scanning: {}", dir.display());

    let mut recognized = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match codec::sniff_file(entry.path()) {
            Ok(FileType::Unknown) => {}
            Ok(file_type) => {
                recognized += 1;
                println!("{}: {}", entry.path().display(), file_type);
            }
            Err(e) => warn!("{}: {}", entry.path().display(), e),
        }
    }

    println!("{} audio file(s) found", recognized);
    Ok(recognized)
}

/// SHA-256 of a buffer's PCM bytes, as lowercase hex.
pub fn pcm_digest(buffer: &WaveBuffer) -> String {
    let digest = Sha256::digest(&buffer.data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Print format details of an audio file.
pub fn info(path: &Path, config: &CodecConfig) -> Result<()> {
    let (file_type, buffer) = codec::load_file_with_type(path, config)?;
    let format = &buffer.format;

    println!("File:        {}", path.display());
    println!("Container:   {}", file_type);
    println!("Sample rate: {} Hz", format.sample_rate);
    println!("Bit depth:   {}", format.bits_per_sample);
    println!("Channels:    {}", format.channels);
    println!("Block align: {} bytes", format.block_align());
    println!("Frames:      {}", buffer.num_samples());
    println!("Duration:    {:.3} s", buffer.total_time());
    println!("PCM SHA-256: {}", pcm_digest(&buffer));

    Ok(())
}

/// Apply the requested transforms to a buffer.
pub fn apply_transforms(buffer: &mut WaveBuffer, options: ConvertOptions) -> Result<()> {
    if options.mono {
        buffer.make_mono()?;
    }
    if options.stereo {
        buffer.make_stereo()?;
    }
    if options.reverse {
        buffer.reverse()?;
    }
    Ok(())
}

/// Decode any supported file, transform it and write a PCM WAV.
pub fn convert(
    input: &Path,
    output: &Path,
    options: ConvertOptions,
    config: &CodecConfig,
) -> Result<()> {
    info!("Converting {} -> {}", input.display(), output.display());

    let mut buffer = codec::load_file(input, config)?;
    apply_transforms(&mut buffer, options)?;
    let written = wav::write_wav_file(output, &buffer)?;

    println!(
        "Wrote {} ({} bytes, {} ch, {:.3} s)",
        output.display(),
        written,
        buffer.format.channels,
        buffer.total_time()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::format::WaveBufferFormat;
    use tempfile::tempdir;

    #[test]
    fn test_pcm_digest_of_empty_buffer() {
        let buffer = WaveBuffer::new(WaveBufferFormat::default());
        assert_eq!(
            pcm_digest(&buffer),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_apply_transforms() {
        let mut buffer =
            WaveBuffer::from_bytes(WaveBufferFormat::new(8000, 8, 2), vec![10, 20, 30, 40]);
        let options = ConvertOptions {
            mono: true,
            reverse: true,
            ..ConvertOptions::default()
        };
        apply_transforms(&mut buffer, options).unwrap();
        assert_eq!(buffer.format.channels, 1);
        assert_eq!(buffer.data, vec![35, 15]);
    }

    #[test]
    fn test_info_on_wav_and_unknown() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let buffer = WaveBuffer::from_bytes(WaveBufferFormat::new(8000, 16, 2), vec![0; 8]);
        wav::write_wav_file(&path, &buffer).unwrap();
        info(&path, &CodecConfig::default()).unwrap();

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"not audio").unwrap();
        assert!(matches!(
            info(&text, &CodecConfig::default()),
            Err(crate::error::WaveError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_convert_and_scan() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        std::fs::write(dir.path().join("notes.txt"), b"not audio").unwrap();

        let buffer =
            WaveBuffer::from_bytes(WaveBufferFormat::new(8000, 16, 1), vec![1, 0, 2, 0, 3, 0]);
        wav::write_wav_file(&input, &buffer).unwrap();

        let options = ConvertOptions {
            stereo: true,
            ..ConvertOptions::default()
        };
        convert(&input, &output, options, &CodecConfig::default()).unwrap();

        let converted = wav::read_wav_file(&output).unwrap();
        assert_eq!(converted.format.channels, 2);
        assert_eq!(converted.data, vec![1, 0, 1, 0, 2, 0, 2, 0, 3, 0, 3, 0]);

        assert_eq!(scan(dir.path()).unwrap(), 2);
    }
}
