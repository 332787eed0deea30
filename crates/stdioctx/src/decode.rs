//! Byte-to-text decoding bridge.
//!
//! [`DecodingSink`] presents a [`ByteSink`] while incrementally
//! decoding the bytes and forwarding the text to a downstream
//! [`TextSink`]. Malformed or unmappable input is replaced with `'?'`
//! instead of failing, and a multi-byte sequence may span any number
//! of write calls: the decoder carries its state across them, so the
//! decoded output is independent of how the byte stream was chunked.
//!
//! The downstream sink may itself be routed back through the
//! interception layer; a write arriving reentrantly from within the
//! bridge's own decode/forward cycle is a silent no-op.

use crate::stream::{ByteSink, TextSink};
use crate::StdioError;
use encoding_rs::{Decoder, DecoderResult, Encoding, UTF_8};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::io;

const INPUT_CAPACITY: usize = 256;
const TEXT_CAPACITY: usize = 256;
const REPLACEMENT: char = '?';

struct DecodeState {
    decoder: Decoder,
    pending: Vec<u8>,
    text: String,
}

/// An output stream which decodes into a text sink.
///
/// # Example
///
/// ```
/// use stdioctx::{ByteSink, DecodingSink, LineLogger, LoggingTextSink};
/// use tracing::Level;
///
/// # struct Discard;
/// # impl LineLogger for Discard {
/// #     fn log(&self, _level: Level, _line: &str) {}
/// # }
/// let sink = DecodingSink::new(LoggingTextSink::new(Discard, Level::INFO));
/// sink.write("geht's\n".as_bytes()).unwrap();
/// sink.flush().unwrap();
/// ```
pub struct DecodingSink<T: TextSink> {
    downstream: T,
    state: ReentrantMutex<RefCell<DecodeState>>,
}

impl<T: TextSink> DecodingSink<T> {
    /// Construct a new instance using UTF-8.
    pub fn new(downstream: T) -> Self {
        Self::with_encoding(downstream, UTF_8)
    }

    /// Construct a new instance using the given encoding.
    pub fn with_encoding(downstream: T, encoding: &'static Encoding) -> Self {
        Self {
            downstream,
            state: ReentrantMutex::new(RefCell::new(DecodeState {
                decoder: encoding.new_decoder_without_bom_handling(),
                pending: Vec::with_capacity(INPUT_CAPACITY),
                text: String::with_capacity(TEXT_CAPACITY),
            })),
        }
    }

    /// Construct a new instance using the named encoding.
    ///
    /// # Errors
    ///
    /// Returns [`StdioError::InvalidArgument`] when the label does not
    /// name a known encoding.
    pub fn for_label(downstream: T, label: &str) -> Result<Self, StdioError> {
        let encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            StdioError::InvalidArgument(format!("unknown encoding label: {label}"))
        })?;
        Ok(Self::with_encoding(downstream, encoding))
    }

    /// The downstream text sink.
    pub fn downstream(&self) -> &T {
        &self.downstream
    }

    /// Decode everything pending and forward it downstream, in
    /// text-buffer-sized cycles. The pending buffer is always empty on
    /// return; on forwarding failure its contents are discarded rather
    /// than retried, and the error propagates.
    fn drain(&self, state: &mut DecodeState) -> io::Result<()> {
        let DecodeState {
            decoder,
            pending,
            text,
        } = state;
        let mut consumed = 0;
        loop {
            let (result, read) =
                decoder.decode_to_string_without_replacement(&pending[consumed..], text, false);
            consumed += read;
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::Malformed(..) => {
                    if text.capacity() - text.len() < REPLACEMENT.len_utf8() {
                        Self::forward(&self.downstream, pending, text)?;
                    }
                    text.push(REPLACEMENT);
                }
                DecoderResult::OutputFull => {
                    Self::forward(&self.downstream, pending, text)?;
                }
            }
        }
        pending.clear();
        if !text.is_empty() {
            Self::forward(&self.downstream, pending, text)?;
        }
        Ok(())
    }

    fn forward(downstream: &T, pending: &mut Vec<u8>, text: &mut String) -> io::Result<()> {
        let result = downstream.write_str(text);
        text.clear();
        if result.is_err() {
            pending.clear();
        }
        result
    }
}

impl<T: TextSink> ByteSink for DecodingSink<T> {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let guard = self.state.lock();
        let Ok(mut state) = guard.try_borrow_mut() else {
            // Reentrant call from within our own decode/forward cycle.
            return Ok(());
        };
        let mut rest = buf;
        while !rest.is_empty() {
            let room = INPUT_CAPACITY - state.pending.len();
            if room == 0 {
                self.drain(&mut state)?;
                continue;
            }
            let take = room.min(rest.len());
            state.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
        }
        Ok(())
    }

    fn write_u8(&self, byte: u8) -> io::Result<()> {
        let guard = self.state.lock();
        let Ok(mut state) = guard.try_borrow_mut() else {
            return Ok(());
        };
        if state.pending.len() == INPUT_CAPACITY {
            self.drain(&mut state)?;
        }
        state.pending.push(byte);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        let guard = self.state.lock();
        let Ok(mut state) = guard.try_borrow_mut() else {
            return Ok(());
        };
        self.drain(&mut state)?;
        self.downstream.flush()
    }

    fn close(&self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Text sink recording every forwarded chunk.
    #[derive(Clone, Default)]
    struct Collect {
        chunks: Arc<Mutex<Vec<String>>>,
        flushes: Arc<Mutex<usize>>,
    }

    impl Collect {
        fn text(&self) -> String {
            self.chunks.lock().concat()
        }
    }

    impl TextSink for Collect {
        fn write_str(&self, text: &str) -> io::Result<()> {
            self.chunks.lock().push(text.to_string());
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            *self.flushes.lock() += 1;
            Ok(())
        }
    }

    /// Text sink that always fails.
    struct Broken;

    impl TextSink for Broken {
        fn write_str(&self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "downstream gone"))
        }

        fn flush(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn decodes_ascii() {
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        sink.write(b"hello").expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), "hello");
    }

    #[test]
    fn multi_byte_sequence_may_span_writes() {
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        // U+00E9 is 0xC3 0xA9 in UTF-8; split it across two writes
        // with a flush in between.
        sink.write(&[0xC3]).expect("write should succeed");
        sink.flush().expect("flush should succeed");
        sink.write(&[0xA9]).expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), "é");
    }

    #[test]
    fn chunking_is_invariant() {
        let input = "túrán ¡bello! мир".as_bytes();
        let whole = {
            let collect = Collect::default();
            let sink = DecodingSink::new(collect.clone());
            sink.write(input).expect("write should succeed");
            sink.flush().expect("flush should succeed");
            collect.text()
        };

        for split in 0..input.len() {
            let collect = Collect::default();
            let sink = DecodingSink::new(collect.clone());
            sink.write(&input[..split]).expect("write should succeed");
            sink.write(&input[split..]).expect("write should succeed");
            sink.flush().expect("flush should succeed");
            assert_eq!(collect.text(), whole, "split at {split}");
        }
    }

    #[test]
    fn malformed_input_becomes_placeholder() {
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        sink.write(&[0xFF, b'A', 0xFE, b'B']).expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), "?A?B");
    }

    #[test]
    fn byte_at_a_time_matches_bulk() {
        let input = "año\nnuevo".as_bytes();
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        for &byte in input {
            sink.write_u8(byte).expect("write_u8 should succeed");
        }
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), "año\nnuevo");
    }

    #[test]
    fn large_write_cycles_the_buffers() {
        let line = "0123456789abcdef".repeat(128); // 2048 bytes, several drain cycles
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        sink.write(line.as_bytes()).expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), line);
    }

    #[test]
    fn named_encoding_decodes() {
        let collect = Collect::default();
        let sink = DecodingSink::for_label(collect.clone(), "iso-8859-1")
            .expect("latin-1 is a known label");

        // 0xE9 is é in latin-1 but malformed as a lone UTF-8 byte.
        sink.write(&[0xE9]).expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(collect.text(), "é");
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        let err = DecodingSink::for_label(Collect::default(), "no-such-charset")
            .err()
            .expect("unknown label must fail");
        assert!(
            matches!(err, StdioError::InvalidArgument(_)),
            "got: {err:?}"
        );
    }

    #[test]
    fn forward_failure_discards_pending_input() {
        let sink = DecodingSink::new(Broken);

        sink.write(b"lost").expect("write only buffers");
        let err = sink.flush().expect_err("flush must surface the failure");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // The pending input was discarded, so a later flush finds
        // nothing to forward and succeeds.
        sink.flush().expect("nothing left to forward");
    }

    #[test]
    fn flush_reaches_downstream() {
        let collect = Collect::default();
        let sink = DecodingSink::new(collect.clone());

        sink.flush().expect("flush should succeed");
        assert_eq!(*collect.flushes.lock(), 1);
    }

    #[test]
    fn reentrant_write_is_a_no_op() {
        /// Sink whose write loops straight back into the bridge.
        struct Loopback {
            bridge: Mutex<Option<Arc<DecodingSink<Loopback>>>>,
            seen: Arc<Mutex<Vec<String>>>,
        }

        impl TextSink for Loopback {
            fn write_str(&self, text: &str) -> io::Result<()> {
                if let Some(bridge) = self.bridge.lock().as_ref() {
                    // Must be absorbed, not recurse or deadlock.
                    bridge.write(b"reentrant")?;
                }
                self.seen.lock().push(text.to_string());
                Ok(())
            }

            fn flush(&self) -> io::Result<()> {
                Ok(())
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(DecodingSink::new(Loopback {
            bridge: Mutex::new(None),
            seen: Arc::clone(&seen),
        }));
        *sink.downstream().bridge.lock() = Some(Arc::clone(&sink));

        sink.write(b"outer").expect("write should succeed");
        sink.flush().expect("flush should succeed");

        assert_eq!(*seen.lock(), vec!["outer".to_string()]);

        // Break the cycle before dropping.
        *sink.downstream().bridge.lock() = None;
    }
}
