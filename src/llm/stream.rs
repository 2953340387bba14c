//! Aggregation of streamed completion bodies.
//!
//! Network chunks arrive as raw bytes. They are decoded as UTF-8 (holding
//! back any multi-byte sequence split across chunks), passed through a
//! [`FrameDecoder`], and appended to the per-request [`StreamState`].

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::framing::FrameDecoder;
use crate::error::AnalysisError;

/// Incremental UTF-8 decoder.
///
/// Incomplete trailing sequences are buffered until the next chunk; invalid
/// sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Decode as much of `pending + bytes` as is complete.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        let mut start = 0;

        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    // The prefix up to valid_up_to() is known to be valid.
                    out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        out
    }

    /// End of input: anything still buffered is an incomplete sequence.
    pub fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

/// Text accumulated so far for one streaming request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamState {
    pub text: String,
}

type ChunkCallback<'a> = Box<dyn FnMut(&str) + Send + 'a>;
type FinishCallback<'a> = Box<dyn FnOnce(&str) + Send + 'a>;

/// Consumes a chunked response, reporting the cumulative text as it grows.
///
/// The chunk callback fires once per chunk that added text, always with the
/// full text so far. The finish callback fires once, after the last chunk,
/// and only if the stream ended cleanly: [`finish`](Self::finish) consumes
/// the aggregator, and an errored or cancelled [`run`](Self::run) drops it
/// without finishing.
pub struct StreamAggregator<'a, F> {
    decoder: Utf8ChunkDecoder,
    frames: F,
    state: StreamState,
    on_chunk: ChunkCallback<'a>,
    on_finish: Option<FinishCallback<'a>>,
}

impl<'a, F: FrameDecoder> StreamAggregator<'a, F> {
    pub fn new(frames: F) -> Self {
        Self {
            decoder: Utf8ChunkDecoder::default(),
            frames,
            state: StreamState::default(),
            on_chunk: Box::new(|_| {}),
            on_finish: None,
        }
    }

    pub fn on_chunk(mut self, callback: impl FnMut(&str) + Send + 'a) -> Self {
        self.on_chunk = Box::new(callback);
        self
    }

    pub fn on_finish(mut self, callback: impl FnOnce(&str) + Send + 'a) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Feed one network chunk.
    pub fn push(&mut self, bytes: &[u8]) {
        let text = self.decoder.decode(bytes);
        let before = self.state.text.len();
        self.frames.feed(&text, &mut self.state.text);
        if self.state.text.len() > before {
            (self.on_chunk)(&self.state.text);
        }
    }

    /// Close the stream cleanly and return the final text.
    pub fn finish(mut self) -> String {
        let before = self.state.text.len();
        let tail = std::mem::take(&mut self.decoder).finish();
        self.frames.feed(&tail, &mut self.state.text);
        self.frames.flush(&mut self.state.text);
        if self.state.text.len() > before {
            (self.on_chunk)(&self.state.text);
        }

        if let Some(on_finish) = self.on_finish.take() {
            on_finish(&self.state.text);
        }
        self.state.text
    }

    /// Drive the aggregator over a byte stream until it ends, errors, or
    /// `cancel` fires.
    pub async fn run<S, B, E>(
        mut self,
        stream: S,
        cancel: &CancellationToken,
    ) -> Result<String, AnalysisError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<AnalysisError>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut chunks = 0usize;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Stream cancelled after {} chunks", chunks);
                    return Err(AnalysisError::Cancelled);
                }
                item = stream.next() => match item {
                    Some(Ok(bytes)) => {
                        chunks += 1;
                        self.push(bytes.as_ref());
                    }
                    Some(Err(e)) => {
                        let err = e.into();
                        debug!("Stream failed after {} chunks: {}", chunks, err);
                        return Err(err);
                    }
                    None => break,
                },
            }
        }

        debug!("Stream finished after {} chunks", chunks);
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::framing::{LineFrames, RawText};
    use futures::stream;

    fn ok_chunks(chunks: &[&'static [u8]]) -> Vec<Result<&'static [u8], AnalysisError>> {
        chunks.iter().map(|c| Ok(*c)).collect()
    }

    #[tokio::test]
    async fn test_cumulative_chunks_then_finish() {
        let mut seen = Vec::new();
        let mut finished = Vec::new();

        let result = StreamAggregator::new(RawText)
            .on_chunk(|text| seen.push(text.to_string()))
            .on_finish(|text| finished.push(text.to_string()))
            .run(
                stream::iter(ok_chunks(&[b"Hel", b"lo, ", b"world"])),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result, "Hello, world");
        assert_eq!(seen, vec!["Hel", "Hello, ", "Hello, world"]);
        assert_eq!(finished, vec!["Hello, world"]);
    }

    #[tokio::test]
    async fn test_split_utf8_is_held_back() {
        // "é" is C3 A9; "👋" is F0 9F 91 8B.
        let chunks: Vec<Result<&'static [u8], AnalysisError>> = ok_chunks(&[
            b"caf\xC3",
            b"\xA9 ",
            b"\xF0\x9F",
            b"\x91\x8B",
        ]);
        let mut seen = Vec::new();

        let result = StreamAggregator::new(RawText)
            .on_chunk(|text| seen.push(text.to_string()))
            .run(stream::iter(chunks), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, "café 👋");
        assert_eq!(seen, vec!["caf", "café ", "café 👋"]);
    }

    #[tokio::test]
    async fn test_error_skips_finish() {
        let chunks: Vec<Result<&'static [u8], AnalysisError>> = vec![
            Ok(&b"partial"[..]),
            Err(AnalysisError::upstream("connection reset")),
            Ok(&b"never"[..]),
        ];
        let mut finished = 0;
        let mut seen = Vec::new();

        let err = StreamAggregator::new(RawText)
            .on_chunk(|text| seen.push(text.to_string()))
            .on_finish(|_| finished += 1)
            .run(stream::iter(chunks), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream { .. }));
        assert_eq!(finished, 0);
        assert_eq!(seen, vec!["partial"]);
    }

    #[tokio::test]
    async fn test_cancelled_stream_skips_finish() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut finished = 0;

        let err = StreamAggregator::new(RawText)
            .on_finish(|_| finished += 1)
            .run(stream::iter(ok_chunks(&[b"a", b"b"])), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled));
        assert_eq!(finished, 0);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let pending = stream::once(async { Ok::<&'static [u8], AnalysisError>(b"first") })
            .chain(stream::pending());

        let handle = tokio::spawn(async move {
            StreamAggregator::new(RawText).run(pending, &cancel).await
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        trigger.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(AnalysisError::Cancelled)));
    }

    #[tokio::test]
    async fn test_line_frames_flush_final_line() {
        let chunks = ok_chunks(&[b"data: {\"content\":\"a\"}\n", b"{\"content\":\"b\"}"]);
        let mut seen = Vec::new();

        let result = StreamAggregator::new(LineFrames::default())
            .on_chunk(|text| seen.push(text.to_string()))
            .run(stream::iter(chunks), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result, "ab");
        assert_eq!(seen, vec!["a", "ab"]);
    }

    #[test]
    fn test_decoder_replaces_invalid_bytes() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        assert_eq!(decoder.decode(b"\xE2\x82"), "");
        assert_eq!(decoder.decode(b"\xAC"), "€");
    }

    #[test]
    fn test_decoder_finish_flushes_incomplete_tail() {
        let mut decoder = Utf8ChunkDecoder::default();
        assert_eq!(decoder.decode(b"ok\xE2\x82"), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
    }

    #[test]
    fn test_push_without_new_text_is_silent() {
        let mut calls = 0;
        {
            let mut aggregator = StreamAggregator::new(RawText).on_chunk(|_| calls += 1);
            aggregator.push(b"\xC3");
            assert_eq!(aggregator.state().text, "");
            aggregator.push(b"\xA9");
            assert_eq!(aggregator.state().text, "é");
        }
        assert_eq!(calls, 1);
    }
}
