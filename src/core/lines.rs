//! Line counting for package source files

use super::diagnostics::Diagnostics;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 32 * 1024;

/// Count newline bytes in a file using buffered reads
pub fn count_lines(path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let mut count = 0;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        if buf.is_empty() {
            return Ok(count);
        }

        count += memchr::memchr_iter(b'\n', buf).count();
        let consumed = buf.len();
        reader.consume(consumed);
    }
}

/// Total lines over `files`. Unreadable files are reported and count as zero.
pub fn lines_of_code<'a, I>(files: I, diagnostics: &dyn Diagnostics) -> usize
where
    I: IntoIterator<Item = &'a Path>,
{
    files
        .into_iter()
        .map(|path| match count_lines(path) {
            Ok(count) => count,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "unable to count lines");
                diagnostics.unreadable_source(path, &err);
                0
            }
        })
        .sum()
}
