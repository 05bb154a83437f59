//! Line-oriented input helpers.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Open `path` as a buffered byte stream.
pub async fn open(path: &Path) -> std::io::Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path).await?))
}

/// Count the lines in `path`, for sizing a progress indicator.
pub async fn count_lines(path: &Path) -> std::io::Result<usize> {
    let mut segments = open(path).await?.split(b'\n');
    let mut count = 0;
    while segments.next_segment().await?.is_some() {
        count += 1;
    }
    Ok(count)
}

/// Reads newline-terminated lines, replacing invalid UTF-8 instead of failing.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    line: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, buf: Vec::new(), line: 0 }
    }

    /// Next line with its 1-based number, without the trailing newline.
    pub async fn next_line(&mut self) -> std::io::Result<Option<(usize, String)>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let text = String::from_utf8_lossy(&self.buf);
        Ok(Some((self.line, text.trim_end_matches(['\n', '\r']).to_string())))
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}
