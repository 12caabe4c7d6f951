use tokio::io::{AsyncRead, AsyncReadExt};

const CHUNK_SIZE_BYTES: usize = 8192;

/// One read outcome from [`BoundedLineReader`].
#[derive(Debug)]
pub(crate) enum ReadLine {
    Line {
        line_number: usize,
        bytes: Vec<u8>,
    },
    /// The line exceeded the limit; its overflow was consumed and discarded
    /// so the next line starts clean.
    TooLong {
        line_number: usize,
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    /// Terminal: the source failed mid-read.
    Io {
        line_number: usize,
        source: std::io::Error,
    },
}

/// Bounded-memory newline splitter over an async byte source.
///
/// Reads fixed-size chunks and accumulates at most `max_line_bytes` per line;
/// the trailing `\n` is never included. Returns `None` on clean end of
/// stream. A line is only a line once its `\n` arrives: an unterminated tail
/// at end of stream is a truncated record and is dropped.
pub(crate) struct BoundedLineReader<R> {
    reader: R,
    max_line_bytes: usize,
    buffer: [u8; CHUNK_SIZE_BYTES],
    buffer_pos: usize,
    buffer_len: usize,
    current_line: Vec<u8>,
    observed_bytes: usize,
    discard_mode: bool,
    line_number: usize,
    done: bool,
    pending_too_long: bool,
}

impl<R: AsyncRead + Unpin> BoundedLineReader<R> {
    pub(crate) fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader,
            max_line_bytes,
            buffer: [0u8; CHUNK_SIZE_BYTES],
            buffer_pos: 0,
            buffer_len: 0,
            current_line: Vec::new(),
            observed_bytes: 0,
            discard_mode: false,
            line_number: 0,
            done: false,
            pending_too_long: false,
        }
    }

    pub(crate) async fn next_line(&mut self) -> Option<ReadLine> {
        if self.done {
            return None;
        }

        loop {
            if self.buffer_pos >= self.buffer_len {
                match self.fill_buffer().await {
                    Ok(0) => {
                        self.done = true;
                        return None;
                    }
                    Ok(_) => {}
                    Err(source) => {
                        self.done = true;
                        self.line_number += 1;
                        return Some(ReadLine::Io {
                            line_number: self.line_number,
                            source,
                        });
                    }
                }
            }

            let (newline_idx, slice_len) = {
                let slice = &self.buffer[self.buffer_pos..self.buffer_len];
                (slice.iter().position(|b| *b == b'\n'), slice.len())
            };

            let Some(newline_idx) = newline_idx else {
                self.observe_bytes(slice_len);
                if !self.discard_mode {
                    let slice = &self.buffer[self.buffer_pos..self.buffer_len];
                    self.current_line.extend_from_slice(slice);
                }
                self.buffer_pos = self.buffer_len;
                continue;
            };

            self.observe_bytes(newline_idx);
            if !self.discard_mode {
                let segment = &self.buffer[self.buffer_pos..self.buffer_pos + newline_idx];
                self.current_line.extend_from_slice(segment);
            }
            self.buffer_pos = self.buffer_pos + newline_idx + 1;
            return Some(self.finish_line());
        }
    }

    async fn fill_buffer(&mut self) -> std::io::Result<usize> {
        self.buffer_pos = 0;
        let n = self.reader.read(&mut self.buffer).await?;
        self.buffer_len = n;
        Ok(n)
    }

    fn finish_line(&mut self) -> ReadLine {
        self.line_number += 1;
        let line_number = self.line_number;

        if self.pending_too_long {
            let observed_bytes = self.observed_bytes;
            let max_line_bytes = self.max_line_bytes;
            self.reset_line_state();
            return ReadLine::TooLong {
                line_number,
                observed_bytes,
                max_line_bytes,
            };
        }

        let bytes = std::mem::take(&mut self.current_line);
        self.reset_line_state();
        ReadLine::Line { line_number, bytes }
    }

    fn reset_line_state(&mut self) {
        self.current_line.clear();
        self.observed_bytes = 0;
        self.discard_mode = false;
        self.pending_too_long = false;
    }

    fn observe_bytes(&mut self, additional: usize) {
        self.observed_bytes = self.observed_bytes.saturating_add(additional);
        if self.observed_bytes > self.max_line_bytes && !self.discard_mode {
            self.discard_mode = true;
            self.pending_too_long = true;
            self.current_line.clear();
        }
    }
}
