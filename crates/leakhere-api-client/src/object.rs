//! Direct PUT of file bytes to a presigned object-storage URL.
//!
//! The body is streamed so progress can be reported as chunks are handed to the
//! connection. Path-backed files are read lazily from disk.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use leakhere_core::models::{FileSource, SelectedFile};
use leakhere_core::ports::{ObjectUploader, ProgressCallback};
use leakhere_core::ApiError;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Body;
use tokio_util::io::ReaderStream;

use crate::{send, ApiClient};

const MEMORY_CHUNK_SIZE: usize = 64 * 1024;

/// Rounded percentage of `sent` over `total`. An empty body is complete.
pub fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    ((sent.min(total) * 100 + total / 2) / total) as u8
}

type ByteStream = BoxStream<'static, io::Result<Bytes>>;

async fn byte_stream(source: &FileSource) -> Result<ByteStream, ApiError> {
    match source {
        FileSource::Memory(data) => {
            let data = data.clone();
            let chunks: Vec<io::Result<Bytes>> = (0..data.len())
                .step_by(MEMORY_CHUNK_SIZE)
                .map(|start| Ok(data.slice(start..(start + MEMORY_CHUNK_SIZE).min(data.len()))))
                .collect();
            Ok(stream::iter(chunks).boxed())
        }
        FileSource::Path(path) => {
            let file = tokio::fs::File::open(path).await?;
            Ok(ReaderStream::new(file).boxed())
        }
    }
}

/// Wrap `inner` so every chunk reports cumulative progress to `on_progress`.
fn with_progress(
    inner: BoxStream<'static, io::Result<Bytes>>,
    total: u64,
    on_progress: ProgressCallback,
) -> BoxStream<'static, io::Result<Bytes>> {
    let mut sent = 0u64;
    inner
        .inspect_ok(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(percent_of(sent, total));
        })
        .boxed()
}

#[async_trait]
impl ObjectUploader for ApiClient {
    async fn put_object(
        &self,
        upload_url: &str,
        file: &SelectedFile,
        on_progress: ProgressCallback,
    ) -> Result<(), ApiError> {
        let body = with_progress(byte_stream(&file.source).await?, file.size, on_progress.clone());

        let request = self
            .client()
            .put(upload_url)
            .header(CONTENT_TYPE, file.mime_type.as_str())
            .header(CONTENT_LENGTH, file.size)
            .body(Body::wrap_stream(body));

        send(request).await?;
        on_progress(100);

        tracing::debug!(file_name = %file.name, size = file.size, "Object uploaded");
        Ok(())
    }
}
