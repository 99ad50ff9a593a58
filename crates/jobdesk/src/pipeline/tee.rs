use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Reader that keeps a copy of every byte it hands out.
///
/// Lets a single pass over an upload feed both the blob backend and the
/// extractor.
#[derive(Debug)]
pub struct TeeReader<R> {
    inner: R,
    buffer: Vec<u8>,
}

impl<R> TeeReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Releases the underlying reader and returns the bytes seen so far.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for TeeReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = &mut *self;
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        this.buffer.extend_from_slice(&buf.filled()[before..]);
        Poll::Ready(Ok(()))
    }
}
