//! Line reading that tolerates invalid UTF-8.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Iterator over the lines of a buffered reader, decoded lossily.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD and the line is
/// reported with a warning, so one bad byte never ends a scan. Trailing
/// `\r` and `\n` are stripped.
#[derive(Debug)]
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
}

/// Read `reader` line by line, decoding each line lossily.
pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
        line_number: 0,
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                    self.buf.pop();
                }
                let line = match String::from_utf8_lossy(&self.buf) {
                    Cow::Borrowed(line) => line.to_string(),
                    Cow::Owned(line) => {
                        tracing::warn!(
                            "Line {} is not valid UTF-8, invalid bytes replaced: {}",
                            self.line_number,
                            line
                        );
                        line
                    }
                };
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
