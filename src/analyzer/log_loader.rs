//! Line-oriented log file reading.
//!
//! The file is read sequentially from the start in a single pass. Bytes that
//! are not valid UTF-8 are replaced rather than aborting the read, since
//! firmware consoles occasionally emit garbage between log lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Buffer size for reading log files (8KB).
const BUFFER_SIZE: usize = 8 * 1024;

/// Sequential reader over the non-empty lines of a log file.
pub struct LogLoader {
    reader: BufReader<File>,
    eof_reached: bool,
    line_buffer: Vec<u8>,
    lines_read: usize,
}

impl LogLoader {
    /// Open a log file for reading.
    ///
    /// # Returns
    ///
    /// `Ok(LogLoader)` if the file opens successfully, the I/O error otherwise
    /// (`ErrorKind::NotFound` for a missing file).
    pub fn open(path: &Path) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(BUFFER_SIZE, file);

        Ok(Self {
            reader,
            eof_reached: false,
            line_buffer: Vec::with_capacity(512),
            lines_read: 0,
        })
    }

    /// Read the next non-empty line, with the line terminator stripped.
    ///
    /// # Returns
    ///
    /// `Ok(Some(line))` while lines remain, `Ok(None)` at EOF.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if self.eof_reached {
                return Ok(None);
            }

            self.line_buffer.clear();
            let read = self.reader.read_until(b'\n', &mut self.line_buffer)?;
            if read == 0 {
                self.eof_reached = true;
                return Ok(None);
            }

            self.lines_read += 1;
            let line = String::from_utf8_lossy(&self.line_buffer);
            let line = line.trim_end();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }

    /// Number of raw lines consumed so far, empty lines included.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}

/// Read every non-empty line of `path`, closing the file before returning.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let mut loader = LogLoader::open(path)?;
    let mut lines = Vec::new();
    while let Some(line) = loader.next_line()? {
        lines.push(line);
    }
    log::debug!("Read {} of {} lines from {}", lines.len(), loader.lines_read(), path.display());
    Ok(lines)
}
