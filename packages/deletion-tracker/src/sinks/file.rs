//! File-backed audit sink.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AuditResult;
use crate::traits::audit::AuditSink;
use crate::types::audit::AuditRecord;

/// Appends deletion records to a text file.
///
/// The file is opened in append mode for every record, so it may be
/// rotated or truncated externally while the tracker runs. Writers are
/// serialized and each record goes out in a single `write_all`.
pub struct FileAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn record(&self, record: &AuditRecord) -> AuditResult<()> {
        let rendered = record.to_string();
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(rendered.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), bytes = rendered.len(), "audit record appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::post::PostRecord;
    use std::sync::Arc;

    fn record(n: usize) -> AuditRecord {
        let post = PostRecord::new(
            format!("t3_{}", n),
            "news",
            format!("Title {}", n),
            format!("https://example.com/{}", n),
        )
        .with_content(format!("line one of {}", n));
        AuditRecord::from_post(&post)
    }

    #[tokio::test]
    async fn test_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deleted_log.txt");
        let sink = FileAuditSink::new(&path);

        tokio_test::assert_ok!(sink.record(&record(1)).await);
        tokio_test::assert_ok!(sink.record(&record(2)).await);

        let contents = std::fs::read_to_string(&path).unwrap();
        let first = contents.find("Title 1").unwrap();
        let second = contents.find("Title 2").unwrap();
        assert!(first < second);
        assert!(contents.contains("Link: https://example.com/1\n"));
        assert!(contents.ends_with("Content: line one of 2\n\n"));
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deleted_log.txt");
        let sink = Arc::new(FileAuditSink::new(&path));

        let mut handles = Vec::new();
        for n in 0..20 {
            let sink = sink.clone();
            handles.push(tokio::spawn(async move { sink.record(&record(n)).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let blocks: Vec<&str> = contents.split_terminator("\n\n").collect();
        assert_eq!(blocks.len(), 20);
        for block in blocks {
            let lines: Vec<&str> = block.lines().collect();
            assert_eq!(lines.len(), 3);
            let n = lines[0].rsplit(' ').next().unwrap();
            assert_eq!(lines[1], format!("Link: https://example.com/{}", n));
            assert_eq!(lines[2], format!("Content: line one of {}", n));
        }
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileAuditSink::new(dir.path().join("missing").join("log.txt"));
        assert!(sink.record(&record(1)).await.is_err());
    }
}
