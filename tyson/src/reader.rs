// SPDX-License-Identifier: Apache-2.0

/// Trait for input sources that refill a streaming [`Cursor`](crate::Cursor).
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    /// - Returning 0 followed by non-zero reads in subsequent calls violates this contract
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// The source type of a cursor built over a complete in-memory document.
///
/// It never produces data, so such a cursor never refills.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSource;

impl Reader for NoSource {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// Adapts any [`std::io::Read`] (files, sockets, stdin) into a [`Reader`].
///
/// Interrupted reads are retried; other I/O errors are passed through.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T: std::io::Read> IoReader<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Read> Reader for IoReader<T> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}
