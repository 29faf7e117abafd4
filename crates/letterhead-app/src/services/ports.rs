// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ports for the environment: the clipboard and the place exported files go.

use std::io::Write;
use std::path::PathBuf;

use letterhead_core::error::{LetterheadError, Result};
use letterhead_document::ExportArtifact;
use tracing::{info, instrument};

/// Somewhere plain text can be copied to.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Receives finished exports, like a browser download.
pub trait FileSink {
    /// Store the artifact and return where it ended up.
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// Writes copied text to standard output so it can be piped into a system
/// clipboard tool (`letterhead copy | wl-copy`).
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| LetterheadError::Clipboard(e.to_string()))
    }
}

/// Writes artifacts into a directory under their suggested filename,
/// replacing any earlier file of the same name in one step.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DirectorySink {
    #[instrument(skip_all, fields(filename = %artifact.filename))]
    fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.filename);

        // Stage next to the target so the rename stays on one filesystem;
        // a failed write drops the temp file and leaves no partial export.
        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        staged.write_all(&artifact.bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| e.error)?;

        info!(path = %path.display(), size = artifact.len(), "export written");
        Ok(path)
    }
}

/// In-memory ports for driving the session and export flow in tests.
#[cfg(test)]
pub mod testing {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use letterhead_core::error::{LetterheadError, Result};
    use letterhead_document::ExportArtifact;

    use super::{Clipboard, FileSink};

    /// Keeps the last copied text in memory.
    #[derive(Default)]
    pub struct MemoryClipboard {
        contents: Mutex<Option<String>>,
    }

    impl MemoryClipboard {
        pub fn contents(&self) -> Option<String> {
            self.contents.lock().ok().and_then(|c| c.clone())
        }
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            let mut contents = self
                .contents
                .lock()
                .map_err(|_| LetterheadError::Clipboard("clipboard lock poisoned".into()))?;
            *contents = Some(text.to_owned());
            Ok(())
        }
    }

    /// Collects artifacts in memory.
    #[derive(Default)]
    pub struct MemorySink {
        delivered: Mutex<Vec<ExportArtifact>>,
    }

    impl MemorySink {
        pub fn delivered(&self) -> Vec<ExportArtifact> {
            self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
        }
    }

    impl FileSink for MemorySink {
        fn deliver(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
            self.delivered
                .lock()
                .map_err(|_| LetterheadError::Storage("sink lock poisoned".into()))?
                .push(artifact.clone());
            Ok(PathBuf::from(&artifact.filename))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryClipboard;
    use super::*;
    use letterhead_core::ExportFormat;

    #[test]
    fn directory_sink_writes_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(tmp.path().join("out"));
        let artifact = ExportArtifact::new("a.txt".into(), ExportFormat::PlainText, b"hello".to_vec());
        let path = sink.deliver(&artifact).expect("deliver");
        assert_eq!(path, tmp.path().join("out").join("a.txt"));
        assert_eq!(std::fs::read(&path).expect("read"), b"hello");
    }

    #[test]
    fn directory_sink_replaces_whole_file_without_leftovers() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(tmp.path());
        let long = ExportArtifact::new("a.txt".into(), ExportFormat::PlainText, b"a much longer letter".to_vec());
        let short = ExportArtifact::new("a.txt".into(), ExportFormat::PlainText, b"short".to_vec());

        sink.deliver(&long).expect("first");
        let path = sink.deliver(&short).expect("second");
        assert_eq!(std::fs::read(&path).expect("read"), b"short");
        assert_eq!(std::fs::read_dir(tmp.path()).expect("read_dir").count(), 1);
    }

    #[test]
    fn directory_sink_failure_writes_nothing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").expect("write");

        let sink = DirectorySink::new(&blocker);
        let artifact = ExportArtifact::new("a.txt".into(), ExportFormat::PlainText, b"hello".to_vec());
        assert!(sink.deliver(&artifact).is_err());
        assert_eq!(std::fs::read_dir(tmp.path()).expect("read_dir").count(), 1);
    }

    #[test]
    fn memory_clipboard_keeps_last_copy() {
        let clipboard = MemoryClipboard::default();
        clipboard.write_text("first").expect("copy");
        clipboard.write_text("second").expect("copy");
        assert_eq!(clipboard.contents().as_deref(), Some("second"));
    }
}
