use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use std::io::Cursor;

/// Sample rate the transcription endpoint receives.
pub const STT_SAMPLE_RATE: u32 = 16000;

/// Frames fed to the resampler per call.
const RESAMPLE_CHUNK: usize = 1024;

/// Creates a resampler to convert between audio sample rates.
pub fn create_resampler(
    in_sampling_rate: f64,
    out_sampling_rate: f64,
    chunk_size: usize,
) -> anyhow::Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,                     // No cutoff frequency, pass all frequencies
        PolynomialDegree::Cubic, // Cubic interpolation for quality
        chunk_size,
        1, // 1 channel (mono)
    )?;
    Ok(resampler)
}

/// Resamples a whole mono recording, flushing the trailing partial chunk.
pub fn resample_mono(samples: &[f32], in_rate: u32, out_rate: u32) -> anyhow::Result<Vec<f32>> {
    if in_rate == out_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = create_resampler(f64::from(in_rate), f64::from(out_rate), RESAMPLE_CHUNK)?;
    let expected = samples.len() * out_rate as usize / in_rate as usize;
    let mut out = Vec::with_capacity(expected + RESAMPLE_CHUNK);

    let mut chunks = samples.chunks_exact(RESAMPLE_CHUNK);
    for chunk in &mut chunks {
        let frames = resampler.process(&[chunk][..], None)?;
        out.extend_from_slice(&frames[0]);
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let frames = resampler.process_partial(Some(&[rest][..]), None)?;
        out.extend_from_slice(&frames[0]);
    }
    Ok(out)
}

/// Averages interleaved frames down to a single channel.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Root-mean-square energy of a block of samples.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Converts a slice of f32 samples to a vector of i16 samples.
pub fn convert_f32_to_i16(pcm32: &[f32]) -> Vec<i16> {
    pcm32
        .iter()
        .map(|&sample| (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}

/// Converts a slice of i16 samples to a vector of f32 samples.
pub fn convert_i16_to_f32(pcm16: &[i16]) -> Vec<f32> {
    pcm16
        .iter()
        .map(|&sample| sample as f32 / 32768.0)
        .collect()
}

/// Encodes mono samples as an in-memory 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> anyhow::Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec)?;
        for sample in convert_f32_to_i16(samples) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(bytes)
}
