//! Streamed report download

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{ApiError, Result};

type ByteStream = Pin<Box<dyn Stream<Item = std::result::Result<Vec<u8>, ApiError>> + Send>>;

/// Upper bound on the buffer preallocated from the server-advertised
/// content length.
const PREALLOC_CAP_BYTES: u64 = 64 * 1024;

/// Binary report archive returned by `get_report_zip`.
///
/// The one resource-owning result in the contract: the caller owns the
/// stream and drives it to completion (or drops it, which releases the
/// underlying connection). Consume via [`Stream`], [`ReportZip::bytes`]
/// or [`ReportZip::write_to`].
pub struct ReportZip {
    content_length: Option<u64>,
    stream: ByteStream,
}

impl ReportZip {
    /// Wrap an HTTP response body as a report stream.
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let content_length = response.content_length();
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ApiError::from))
            .boxed();

        Self {
            content_length,
            stream,
        }
    }

    /// Build a report from in-memory bytes. Used by mocks and tests.
    #[allow(dead_code)]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let content_length = Some(bytes.len() as u64);
        let stream = futures::stream::iter(vec![Ok(bytes)]).boxed();

        Self {
            content_length,
            stream,
        }
    }

    /// Total size in bytes, when the service reported one.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Drain the stream into a single buffer.
    ///
    /// The advertised content length is an untrusted hint, so the
    /// preallocation is capped and the buffer grows with the bytes that
    /// actually arrive.
    pub async fn bytes(mut self) -> Result<Vec<u8>> {
        let hint = self
            .content_length
            .unwrap_or(0)
            .min(PREALLOC_CAP_BYTES) as usize;
        let mut buf = Vec::with_capacity(hint);
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf)
    }

    /// Stream the archive into `writer`, returning the bytes written.
    pub async fn write_to<W: AsyncWrite + Unpin>(mut self, writer: &mut W) -> Result<u64> {
        let mut written = 0u64;
        while let Some(chunk) = self.stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        Ok(written)
    }
}

impl Stream for ReportZip {
    type Item = std::result::Result<Vec<u8>, ApiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().stream.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for ReportZip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportZip")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}
