//! JSON-lines reporter — one serialized [`FeedMetrics`] per line.

use feedmix_core::{FeedMetrics, MetricsError, MetricsReporter};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

pub struct JsonLinesReporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the reporter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl JsonLinesReporter<BufWriter<File>> {
    /// Append to `path`, creating it and its parent directory if needed.
    pub fn open(path: &Path) -> Result<Self, MetricsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> MetricsReporter for JsonLinesReporter<W> {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn report(&self, metrics: &FeedMetrics) -> Result<(), MetricsError> {
        let mut line = serde_json::to_vec(metrics)?;
        line.push(b'\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| MetricsError::Sink("jsonl writer lock poisoned".into()))?;
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_feed() {
        let reporter = JsonLinesReporter::new(Vec::new());
        let mut first = FeedMetrics::new(5);
        first.total_items = 3;
        reporter.report(&first).unwrap();
        reporter.report(&FeedMetrics::new(7)).unwrap();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FeedMetrics = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, first);
    }

    #[test]
    fn io_failure_is_metrics_error() {
        let reporter = JsonLinesReporter::new(BrokenWriter);
        let err = reporter.report(&FeedMetrics::new(1)).unwrap_err();
        assert!(matches!(err, MetricsError::Io(_)));
    }

    #[test]
    fn open_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics").join("feed.jsonl");

        JsonLinesReporter::open(&path)
            .unwrap()
            .report(&FeedMetrics::new(1))
            .unwrap();
        JsonLinesReporter::open(&path)
            .unwrap()
            .report(&FeedMetrics::new(2))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
