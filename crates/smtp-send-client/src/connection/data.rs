//! DATA section framing.
//!
//! Bytes written during DATA are sent line by line: a leading `.` is doubled,
//! bare LF goes out as CRLF, and closing the section makes sure the final
//! line is terminated before the `.` end marker.

/// Position of the encoder within the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LineState {
    /// At the start of a line.
    #[default]
    Begin,
    /// Just after a CR.
    Cr,
    /// Inside a line.
    Data,
}

/// Streaming dot-stuffing encoder.
#[derive(Debug, Clone, Default)]
pub struct DotEncoder {
    state: LineState,
}

impl DotEncoder {
    /// Creates an encoder positioned at the start of a line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LineState::Begin,
        }
    }

    /// Encodes `input`, appending the wire bytes to `out`.
    ///
    /// The encoder keeps its line position across calls, so input may be
    /// split at any byte.
    pub fn encode(&mut self, input: &[u8], out: &mut Vec<u8>) {
        out.reserve(input.len());
        for &byte in input {
            match self.state {
                LineState::Begin | LineState::Data => {
                    if self.state == LineState::Begin && byte == b'.' {
                        out.push(b'.');
                    }
                    self.state = match byte {
                        b'\r' => LineState::Cr,
                        b'\n' => {
                            out.push(b'\r');
                            LineState::Begin
                        }
                        _ => LineState::Data,
                    };
                }
                LineState::Cr => {
                    self.state = if byte == b'\n' {
                        LineState::Begin
                    } else {
                        LineState::Data
                    };
                }
            }
            out.push(byte);
        }
    }

    /// Appends the end-of-data marker, terminating any open line first.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        match self.state {
            LineState::Data => out.extend_from_slice(b"\r\n"),
            LineState::Cr => out.push(b'\n'),
            LineState::Begin => {}
        }
        out.extend_from_slice(b".\r\n");
        self.state = LineState::Begin;
    }
}
