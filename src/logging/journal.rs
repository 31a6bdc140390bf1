// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

// Original code found here:
// https://github.com/swsnr/systemd-journal-logger.rs/blob/v2.2.1/src/lib.rs#L76

use std::{env, io::stderr, os::fd::AsFd as _};

/// Whether stderr is the stream systemd announced in `$JOURNAL_STREAM`.
///
/// systemd sets the variable to `<device>:<inode>` of the journal stream it
/// connected; see `systemd.exec(5)`.
pub fn connected_to_journal() -> bool {
    let Some(journal_stream) = env::var_os("JOURNAL_STREAM") else {
        return false;
    };
    match rustix::fs::fstat(stderr().as_fd()) {
        Ok(stat) => journal_stream.to_string_lossy() == format!("{}:{}", stat.st_dev, stat.st_ino),
        Err(_) => false,
    }
}
