//! Incremental decoder for streamed (`stream=true`) chat-completion responses.
//!
//! The body is a sequence of newline-delimited frames. Frames of interest look
//! like `data: {json}` where `choices[0].delta.content` carries the next text
//! fragment. The sequence ends on `data: [DONE]`, on a chunk whose
//! `finish_reason` is set, or when the transport closes.
//!
//! [`FrameDecoder`] is the pure, push-based core: feed it raw bytes in whatever
//! pieces the transport hands out and it returns the deltas completed so far.
//! [`decode_stream`] wraps it around any async byte stream.
//!
//! Frames whose payload is not valid JSON are skipped and counted; they never
//! end the sequence.

use std::{fmt::Display, pin::Pin};

use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::error_handler::{AiLlmError, Result};

/// Boxed stream of text deltas, as returned by the streaming client.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// Push-based frame decoder.
///
/// Bytes are buffered until a full line is available, so frames split across
/// transport chunks (even inside a multi-byte UTF-8 sequence) decode the same
/// as frames delivered whole.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    finished: bool,
    frames: usize,
    skipped: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next transport chunk and returns the deltas it completed.
    ///
    /// Once the sequence has ended, further input is ignored.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        if self.finished {
            return out;
        }
        self.buf.extend_from_slice(chunk);

        let mut start = 0;
        while let Some(pos) = self.buf[start..].iter().position(|b| *b == b'\n') {
            let end = start + pos;
            let line = String::from_utf8_lossy(&self.buf[start..end]).into_owned();
            start = end + 1;
            self.decode_line(&line, &mut out);
            if self.finished {
                break;
            }
        }
        self.buf.drain(..start);
        if self.finished {
            self.buf.clear();
        }
        out
    }

    /// Decodes a trailing frame left without a newline when the transport closed.
    pub fn finish(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.finished && !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf).into_owned();
            self.decode_line(&line, &mut out);
        }
        self.buf.clear();
        self.finished = true;
        out
    }

    /// `true` once an end-of-stream frame was seen (or [`finish`](Self::finish) ran).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of `data:` frames seen so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of frames dropped because their payload was not valid JSON.
    pub fn skipped_frames(&self) -> usize {
        self.skipped
    }

    fn decode_line(&mut self, line: &str, out: &mut Vec<String>) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
            // comments (`:`), `event:`/`id:` fields and blank separators
            return;
        };
        let payload = rest.strip_prefix(' ').unwrap_or(rest).trim_end();
        if payload.is_empty() {
            return;
        }
        self.frames += 1;

        if payload == DONE_MARKER {
            trace!("received [DONE]");
            self.finished = true;
            return;
        }

        let chunk: StreamChunk = match serde_json::from_str(payload) {
            Ok(c) => c,
            Err(e) => {
                self.skipped += 1;
                debug!(error = %e, frame = self.frames, "skipping malformed stream frame");
                return;
            }
        };

        let Some(choice) = chunk.choices.unwrap_or_default().into_iter().next() else {
            return;
        };
        if let Some(content) = choice.delta.and_then(|d| d.content) {
            if !content.is_empty() {
                out.push(content);
            }
        }
        if choice.finish_reason.is_some_and(|r| !r.is_empty()) {
            trace!("received finish_reason");
            self.finished = true;
        }
    }
}

/// Turns an async byte stream into a lazy stream of text deltas.
///
/// A transport error is yielded once as [`AiLlmError::Stream`] and ends the
/// sequence. Dropping the returned stream drops `bytes`, which aborts the
/// underlying read.
pub fn decode_stream<S, B, E>(bytes: S) -> DeltaStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = FrameDecoder::new();
        let mut deltas = 0usize;

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for delta in decoder.push(chunk.as_ref()) {
                        deltas += 1;
                        yield Ok(delta);
                    }
                    if decoder.is_finished() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, deltas, "stream read failed");
                    yield Err(AiLlmError::Stream(e.to_string()));
                    return;
                }
            }
        }

        for delta in decoder.finish() {
            deltas += 1;
            yield Ok(delta);
        }

        debug!(
            frames = decoder.frames(),
            skipped_frames = decoder.skipped_frames(),
            deltas,
            "event stream drained"
        );
    })
}

/* ===========================================================================
Frame payloads
======================================================================== */

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Option<Vec<StreamChoice>>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
