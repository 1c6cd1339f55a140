// Integration test for WAV replay through the protocol client
//
// The scripted engine reads PCM bytes as text, so the fixture's samples are
// ASCII `word:conf` tokens packed two bytes per sample, one token per segment.

mod common;

use anyhow::Result;
use common::{spawn_server, ScriptedLoader};
use hound::{SampleFormat, WavSpec, WavWriter};
use solfege_asr::audio::AudioFile;
use solfege_asr::client;
use tempfile::TempDir;

#[tokio::test]
async fn test_replay_one_segment_per_slice() -> Result<()> {
    let url = spawn_server(ScriptedLoader).await;

    // 8 bytes = 4 samples = 4ms at 1kHz
    let script = b"do:0.9  mi:0.5  sol:0.75";
    let dir = TempDir::new()?;
    let path = dir.path().join("script.wav");
    let spec = WavSpec {
        channels: 1,
        sample_rate: 1000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec)?;
    for pair in script.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;

    let audio = AudioFile::open(&path)?;
    let results = client::replay(&url, &audio, 4, 1).await?;

    let summary: Vec<(i64, Option<&str>, Option<f64>)> = results
        .iter()
        .map(|r| (r.segment_id, r.word.as_deref(), r.confidence))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, Some("do"), Some(0.9)),
            (1, Some("mi"), Some(0.5)),
            (2, Some("sol"), Some(0.75)),
        ]
    );

    Ok(())
}
