//! Mock transport stream for testing
//!
//! Simulates the inverter end of the link without hardware. Incoming data is
//! queued as discrete chunks, one per read, because the wait/match loop
//! works on whole read chunks; a drained queue leaves the reader pending so
//! timeout handling can be exercised.

use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Mock byte stream with scripted reads and captured writes.
#[derive(Clone, Default)]
pub struct MockStream {
    /// Chunks handed out one per read call.
    rx_chunks: Arc<Mutex<VecDeque<Vec<u8>>>>,
    /// Everything written to the stream.
    tx_buffer: Arc<Mutex<Vec<u8>>>,
    /// Error returned by the next read or write.
    next_error: Arc<Mutex<Option<io::Error>>>,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one chunk to be returned by a single future read.
    pub fn queue_rx_chunk(&self, data: &[u8]) {
        self.rx_chunks.lock().unwrap().push_back(data.to_vec());
    }

    /// Get everything written to the stream so far.
    pub fn tx_data(&self) -> Vec<u8> {
        self.tx_buffer.lock().unwrap().clone()
    }

    /// Set an error to be returned by the next operation.
    pub fn set_next_error(&self, error: io::Error) {
        *self.next_error.lock().unwrap() = Some(error);
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Poll::Ready(Err(error));
        }

        let mut chunks = self.rx_chunks.lock().unwrap();
        match chunks.pop_front() {
            Some(chunk) => {
                let n = chunk.len().min(buf.remaining());
                buf.put_slice(&chunk[..n]);
                Poll::Ready(Ok(()))
            }
            // Nothing queued: stay pending so the caller's timeout fires.
            None => Poll::Pending,
        }
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Poll::Ready(Err(error));
        }
        self.tx_buffer.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
