use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::train::error::TrainError;

/// Decoded mono signal.
#[derive(Debug, Clone)]
pub struct MonoSignal {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

/// Decodes a WAV file into mono samples in [-1, 1].
///
/// Integer and float encodings are accepted. Multi-channel files are
/// averaged down to one channel.
pub fn read_mono(path: &Path) -> Result<MonoSignal, TrainError> {
    let audio_err = |source| TrainError::Audio { path: path.to_path_buf(), source };
    let reader = WavReader::open(path).map_err(audio_err)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(audio_err)?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
                .map_err(audio_err)?
        }
    };

    if interleaved.is_empty() {
        return Err(TrainError::EmptyAudio { path: path.to_path_buf() });
    }

    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect();

    Ok(MonoSignal { samples, sample_rate: spec.sample_rate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    #[test]
    fn averages_stereo_int_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec { channels: 2, sample_rate: 48_000, bits_per_sample: 16, sample_format: SampleFormat::Int };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (l, r) in [(16384i16, 0i16), (-16384, -16384)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let signal = read_mono(&path).unwrap();
        assert_eq!(signal.sample_rate, 48_000);
        assert_eq!(signal.samples.len(), 2);
        assert!((signal.samples[0] - 0.25).abs() < 1e-9);
        assert!((signal.samples[1] + 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_audio_error() {
        let err = read_mono(Path::new("/definitely/not/here.wav")).unwrap_err();
        assert!(matches!(err, TrainError::Audio { .. }));
    }
}
