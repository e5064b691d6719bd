//! The communication log: an append-only Markdown archive of published drafts.
//!
//! ```text
//! # External Communication Log
//! ...header...
//! - 2026-10-19 | Channel: Issue | Link: https://github.com/acme/site/issues/3
//!   Text: Launch v2 Details follow.
//! ```
//!
//! The header is written once, when the file is first created. Each run
//! appends one entry after the existing content in a single write; the
//! existing bytes are never rewritten. Symlinked logs are followed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::error::{BridgeError, Result};

/// Maximum snippet length, in characters.
const SNIPPET_LIMIT: usize = 200;

const ELLIPSIS: &str = "...";

const HEADER: &str = "# External Communication Log\n\
\n\
This file is the **running archive** of all messages published through \
the External Communication Module.\n\
Every entry should include: **date, channel, text snippet, and link**.\n\
\n\
## 📜 Log Entries\n\
\n\
*(Newest entries go at the top)*\n\
\n";

/// Append an entry dated today (UTC) to the log at `path`.
pub fn append_entry(path: &Path, channel: &str, url: &str, text: &str) -> Result<()> {
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
    append_entry_on(path, today, channel, url, text)
}

/// Append an entry with an explicit date.
pub fn append_entry_on(
    path: &Path,
    date: Date,
    channel: &str,
    url: &str,
    text: &str,
) -> Result<()> {
    let log_err = |source: io::Error| BridgeError::Log {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(log_err)?;

    let mut entry = format_entry(date, channel, url, text);
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => {
            tracing::info!(path = %path.display(), "creating log");
            entry.insert_str(0, HEADER);
            file
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let mut file = OpenOptions::new()
                .read(true)
                .append(true)
                .open(path)
                .map_err(log_err)?;
            if !ends_with_newline(&mut file).map_err(log_err)? {
                entry.insert(0, '\n');
            }
            file
        }
        Err(e) => return Err(log_err(e)),
    };

    file.write_all(entry.as_bytes()).map_err(log_err)?;
    file.sync_all().map_err(log_err)?;

    tracing::info!(path = %path.display(), %channel, "appended log entry");
    Ok(())
}

/// Whether the file's last byte is a line feed. An empty file is not.
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// One log entry: a list item with the text snippet on a continuation line.
pub fn format_entry(date: Date, channel: &str, url: &str, text: &str) -> String {
    format!(
        "- {date} | Channel: {channel} | Link: {url}\n  Text: {}\n",
        snippet(text)
    )
}

/// Whitespace-collapsed preview of `text`, at most [`SNIPPET_LIMIT`] characters.
pub fn snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_LIMIT {
        return collapsed;
    }
    let mut cut: String = collapsed
        .chars()
        .take(SNIPPET_LIMIT - ELLIPSIS.len())
        .collect();
    cut.push_str(ELLIPSIS);
    cut
}
