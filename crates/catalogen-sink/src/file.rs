use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use catalogen_core::ProductDraft;

use crate::errors::{SinkError, SinkResult};
use crate::sink::{BatchSink, SinkReceipt, SinkSummary};

/// One line of the output file.
#[derive(Debug, Serialize)]
pub struct BatchEnvelope<'a> {
    pub batch: usize,
    pub resources: &'a [ProductDraft],
}

/// Writes each batch as a JSON line `{"batch": n, "resources": [...]}`.
pub struct FileSink {
    path: PathBuf,
    writer: Option<CountingWriter<BufWriter<File>>>,
    summary: SinkSummary,
}

impl FileSink {
    pub fn create(path: impl Into<PathBuf>) -> SinkResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let file = File::create(&path)?;
        info!(event = "file_sink_opened", path = %path.display());

        Ok(Self {
            summary: SinkSummary::new(path.display().to_string()),
            writer: Some(CountingWriter::new(BufWriter::new(file))),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&mut self) -> SinkResult<&mut CountingWriter<BufWriter<File>>> {
        self.writer
            .as_mut()
            .ok_or_else(|| SinkError::Config(format!("{} is already closed", self.path.display())))
    }
}

#[async_trait]
impl BatchSink for FileSink {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn send(&mut self, batch: usize, resources: &[ProductDraft]) -> SinkResult<SinkReceipt> {
        let writer = self.writer()?;
        let before = writer.bytes_written();
        serde_json::to_writer(&mut *writer, &BatchEnvelope { batch, resources })?;
        writer.write_all(b"\n")?;

        let receipt = SinkReceipt {
            batch,
            resources: resources.len(),
            bytes_written: writer.bytes_written() - before,
            ..SinkReceipt::default()
        };
        self.summary.record(&receipt);
        Ok(receipt)
    }

    async fn finish(&mut self) -> SinkResult<SinkSummary> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            info!(
                event = "file_sink_closed",
                path = %self.path.display(),
                bytes_written = writer.bytes_written()
            );
        }
        Ok(self.summary.clone())
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
