//! Integration Tests
//!
//! End-to-end tests across the container codecs and the wave-buffer engine.

use std::io::Cursor;

use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavSpec};
use tempfile::tempdir;

use wavekit::codec::extended::{decode_extended, encode_extended};
use wavekit::codec::wav::{read_wav, read_wav_file, write_wav, write_wav_file};
use wavekit::codec::{classify_stream, load_file, FileType};
use wavekit::{CodecConfig, WaveBuffer, WaveBufferFormat, WaveError};

/// Helper to create a 16-bit test tone buffer
fn create_tone(channels: u16, sample_rate: u32, secs: f64) -> WaveBuffer {
    WaveBuffer::generate_tone(WaveBufferFormat::new(sample_rate, 16, channels), 440.0, secs)
        .unwrap()
}

/// Build a minimal AIFF file around big-endian PCM
fn build_aiff(channels: i16, bits: i16, rate: f64, frames: u32, pcm_be: &[u8]) -> Vec<u8> {
    let mut comm = Vec::new();
    comm.extend_from_slice(&channels.to_be_bytes());
    comm.extend_from_slice(&frames.to_be_bytes());
    comm.extend_from_slice(&bits.to_be_bytes());
    comm.extend_from_slice(&encode_extended(rate));

    let mut body = b"AIFF".to_vec();
    body.extend_from_slice(b"COMM");
    body.extend_from_slice(&(comm.len() as u32).to_be_bytes());
    body.extend_from_slice(&comm);
    body.extend_from_slice(b"SSND");
    body.extend_from_slice(&(pcm_be.len() as u32 + 8).to_be_bytes());
    body.extend_from_slice(&[0; 8]);
    body.extend_from_slice(pcm_be);

    let mut out = b"FORM".to_vec();
    out.extend_from_slice(&(body.len() as i32).to_be_bytes());
    out.extend_from_slice(&body);
    out
}

// === WAV Round Trip ===

#[test]
fn test_wav_round_trip_is_bit_exact() {
    for channels in [1u16, 2] {
        for bits in [8u16, 16] {
            let format = WaveBufferFormat::new(11025, bits, channels);
            let original = WaveBuffer::generate_tone(format, 300.0, 0.1).unwrap();

            let mut bytes = Vec::new();
            write_wav(&mut bytes, &original).unwrap();
            let decoded = read_wav(&mut Cursor::new(bytes)).unwrap();

            assert_eq!(decoded, original, "{} ch, {} bit", channels, bits);
        }
    }
}

#[test]
fn test_wav_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tone.wav");

    let original = create_tone(2, 44100, 0.25);
    write_wav_file(&path, &original).unwrap();

    let loaded = load_file(&path, &CodecConfig::default()).unwrap();
    assert_eq!(loaded, original);
    assert_abs_diff_eq!(loaded.total_time(), 0.25, epsilon = 1e-9);
}

#[test]
fn test_read_missing_file() {
    let result = read_wav_file(std::path::Path::new("/nonexistent/path/audio.wav"));
    match result.unwrap_err() {
        WaveError::FileNotFound { path } => assert!(path.contains("nonexistent")),
        other => panic!("Expected FileNotFound error, got: {:?}", other),
    }
}

// === Interop with hound ===

#[test]
fn test_hound_reads_our_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ours.wav");

    let original = create_tone(2, 22050, 0.1);
    write_wav_file(&path, &original).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 16);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    let expected: Vec<i16> = original
        .data
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(samples, expected);
}

#[test]
fn test_we_read_hound_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hound.wav");

    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let written: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];
    {
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in &written {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    let buffer = read_wav_file(&path).unwrap();
    assert_eq!(buffer.format, WaveBufferFormat::new(8000, 16, 1));
    assert_eq!(buffer.num_samples(), written.len());

    let normalized = buffer.to_normalized().unwrap();
    assert_abs_diff_eq!(normalized[0], 0.0);
    assert_abs_diff_eq!(normalized[3], 1.0);
    assert_abs_diff_eq!(normalized[4], -1.0);
}

// === Transforms ===

#[test]
fn test_reverse_twice_restores_buffer() {
    let original = create_tone(2, 8000, 0.05);
    let mut buffer = original.clone();
    buffer.reverse().unwrap();
    buffer.reverse().unwrap();
    assert_eq!(buffer, original);
}

#[test]
fn test_mono_then_stereo_preserves_duration() {
    let original = create_tone(2, 8000, 0.05);
    let mut buffer = original.clone();
    buffer.make_mono().unwrap();
    assert_eq!(buffer.format.channels, 1);
    assert_eq!(buffer.data.len(), original.data.len() / 2);

    buffer.make_stereo().unwrap();
    assert_eq!(buffer.format.channels, 2);
    assert_eq!(buffer.total_time(), original.total_time());
    assert_eq!(buffer.num_samples(), original.num_samples());

    for frame in buffer.data.chunks_exact(4) {
        assert_eq!(frame[0..2], frame[2..4]);
    }
}

// === AIFF ===

#[test]
fn test_aiff_to_wav_conversion() {
    // Mono 16-bit, 3 frames
    let pcm_be = [0x00, 0x10, 0xFF, 0xF0, 0x7F, 0xFF];
    let aiff = build_aiff(1, 16, 22050.0, 3, &pcm_be);

    let mut cursor = Cursor::new(aiff);
    assert_eq!(classify_stream(&mut cursor).unwrap(), FileType::Aiff);
    assert_eq!(cursor.position(), 0);

    let buffer = wavekit::read_wave_buffer(&mut cursor, &CodecConfig::default()).unwrap();
    assert_eq!(buffer.format, WaveBufferFormat::new(22050, 16, 1));
    assert_eq!(buffer.data, vec![0x10, 0x00, 0xF0, 0xFF, 0xFF, 0x7F]);

    let mut wav_bytes = Vec::new();
    write_wav(&mut wav_bytes, &buffer).unwrap();
    assert_eq!(read_wav(&mut Cursor::new(wav_bytes)).unwrap(), buffer);
}

#[test]
fn test_aiff_file_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mono.aiff");
    std::fs::write(&path, build_aiff(2, 8, 8000.0, 1, &[0x01, 0xFF])).unwrap();

    let buffer = load_file(&path, &CodecConfig::default()).unwrap();
    assert_eq!(buffer.format, WaveBufferFormat::new(8000, 8, 2));
    assert_eq!(buffer.data, vec![0x81, 0x7F]);
}

// === Extended float ===

#[test]
fn test_extended_reference_rates() {
    let rate_44100 = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];
    assert_abs_diff_eq!(decode_extended(&rate_44100), 44100.0, epsilon = 1e-9);

    let all_ones_exponent = [0x7F, 0xFF, 0x80, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(decode_extended(&all_ones_exponent), f64::INFINITY);
}

// === Sniffer ===

#[test]
fn test_sniffer_scenarios_keep_cursor() {
    let cases: Vec<(Vec<u8>, FileType)> = vec![
        (b"RIFF____WAVE".to_vec(), FileType::Wave),
        (b"FORM____AIFF".to_vec(), FileType::Aiff),
        (b"OggS".to_vec(), FileType::OggVorbis),
        (b"ID3\x04 mp3 data".to_vec(), FileType::Unknown),
    ];

    for (bytes, expected) in cases {
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(2);
        assert_eq!(classify_stream(&mut cursor).unwrap(), expected);
        assert_eq!(cursor.position(), 2);
    }
}
