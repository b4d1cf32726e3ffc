//! Response chunk accumulation

use bytes::{Bytes, BytesMut};

/// Streamed-chunk accumulator.
///
/// Tracks received chunks without copying until a second chunk arrives;
/// `finalize` performs the single deferred concatenation.
#[derive(Debug, Default)]
pub(crate) enum ChunkBuffer {
    #[default]
    Empty,
    Single(Bytes),
    Many(Vec<Bytes>),
}

impl ChunkBuffer {
    pub(crate) fn push(&mut self, chunk: Bytes) {
        *self = match std::mem::take(self) {
            ChunkBuffer::Empty => ChunkBuffer::Single(chunk),
            ChunkBuffer::Single(first) => ChunkBuffer::Many(vec![first, chunk]),
            ChunkBuffer::Many(mut chunks) => {
                chunks.push(chunk);
                ChunkBuffer::Many(chunks)
            }
        };
    }

    /// Concatenate into the final payload. Zero chunks yield an empty buffer,
    /// a single chunk is passed through untouched.
    pub(crate) fn finalize(self) -> Bytes {
        match self {
            ChunkBuffer::Empty => Bytes::new(),
            ChunkBuffer::Single(chunk) => chunk,
            ChunkBuffer::Many(chunks) => {
                let mut buf = BytesMut::with_capacity(chunks.iter().map(Bytes::len).sum());
                for chunk in &chunks {
                    buf.extend_from_slice(chunk);
                }
                buf.freeze()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunks_finalize_empty() {
        assert_eq!(ChunkBuffer::default().finalize(), Bytes::new());
    }

    #[test]
    fn single_chunk_passes_through() {
        let chunk = Bytes::from_static(b"only");
        let mut buf = ChunkBuffer::default();
        buf.push(chunk.clone());
        let out = buf.finalize();
        assert_eq!(out, chunk);
        // same allocation, no copy for the single-chunk case
        assert_eq!(out.as_ptr(), chunk.as_ptr());
    }

    #[test]
    fn many_chunks_concatenate_in_order() {
        let mut buf = ChunkBuffer::default();
        buf.push(Bytes::from_static(b"one "));
        buf.push(Bytes::from_static(b"two "));
        buf.push(Bytes::from_static(b"three"));
        assert_eq!(buf.finalize(), Bytes::from_static(b"one two three"));
    }
}
