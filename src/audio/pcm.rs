/// Reassembles 16-bit little-endian samples from arbitrarily split byte chunks
///
/// Binary frame boundaries carry no meaning, so a chunk may end halfway
/// through a sample. The dangling byte is held until the next chunk.
#[derive(Debug, Default)]
pub struct Pcm16Decoder {
    carry: Option<u8>,
}

impl Pcm16Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as many whole samples as `bytes` (plus any carried byte) holds
    pub fn push(&mut self, bytes: &[u8]) -> Vec<i16> {
        let mut samples = Vec::with_capacity((bytes.len() + 1) / 2);
        let mut rest = bytes;

        if let Some(low) = self.carry.take() {
            match rest.split_first() {
                Some((&high, tail)) => {
                    samples.push(i16::from_le_bytes([low, high]));
                    rest = tail;
                }
                None => {
                    self.carry = Some(low);
                    return samples;
                }
            }
        }

        let mut pairs = rest.chunks_exact(2);
        samples.extend(pairs.by_ref().map(|pair| i16::from_le_bytes([pair[0], pair[1]])));
        self.carry = pairs.remainder().first().copied();

        samples
    }

    /// Drop any carried partial sample
    pub fn reset(&mut self) {
        self.carry = None;
    }
}

/// Encode samples as 16-bit little-endian PCM bytes
pub fn encode_pcm16(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Number of samples covering `duration_ms` at `sample_rate`
pub fn samples_for_duration(sample_rate: u32, duration_ms: u64) -> usize {
    (sample_rate as u64 * duration_ms / 1000) as usize
}
