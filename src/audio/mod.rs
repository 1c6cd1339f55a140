pub mod file;
pub mod pcm;

pub use file::AudioFile;
pub use pcm::{encode_pcm16, samples_for_duration, Pcm16Decoder};
