//! Framed IPC codec.
//!
//! Every logical value is length-prefixed, except the two fixed-width
//! integer primitives (`u64`, `u32`), which are written raw — their width
//! is already known to the reader, so no extra framing is needed. `bool`,
//! `string`, and `bytes` are all framed as an 8-byte big-endian length
//! followed by the payload.
//!
//! Reads block until the full length, then block until the full payload:
//! there are no partial returns, and I/O errors propagate rather than
//! being silently truncated. The codec is stateless — every function
//! here is a free function over any `AsyncRead`/`AsyncWrite`.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Writes a `u64` as 8 raw big-endian bytes (no length prefix).
pub async fn write_u64<W: AsyncWrite + Unpin>(w: &mut W, value: u64) -> io::Result<()> {
    w.write_all(&value.to_be_bytes()).await
}

/// Reads a `u64` as 8 raw big-endian bytes (no length prefix).
pub async fn read_u64<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).await?;
    Ok(u64::from_be_bytes(buf))
}

/// Writes a `u32` as 4 raw big-endian bytes (no length prefix).
pub async fn write_u32<W: AsyncWrite + Unpin>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_be_bytes()).await
}

/// Reads a `u32` as 4 raw big-endian bytes (no length prefix).
pub async fn read_u32<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).await?;
    Ok(u32::from_be_bytes(buf))
}

/// Writes a length-framed `bool`: length `1`, then one byte (`0x00`/`0x01`).
pub async fn write_bool<W: AsyncWrite + Unpin>(w: &mut W, value: bool) -> io::Result<()> {
    write_u64(w, 1).await?;
    w.write_all(&[u8::from(value)]).await
}

/// Reads a length-framed `bool`.
pub async fn read_bool<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<bool> {
    let len = read_u64(r).await?;
    if len != 1 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bool frame length {len} != 1"),
        ));
    }
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf).await?;
    Ok(buf[0] != 0)
}

/// Writes a length-framed UTF-8 string.
pub async fn write_string<W: AsyncWrite + Unpin>(w: &mut W, value: &str) -> io::Result<()> {
    write_bytes(w, value.as_bytes()).await
}

/// Reads a length-framed UTF-8 string.
pub async fn read_string<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<String> {
    let bytes = read_bytes(r).await?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a length-framed raw byte string.
pub async fn write_bytes<W: AsyncWrite + Unpin>(w: &mut W, value: &[u8]) -> io::Result<()> {
    write_u64(w, value.len() as u64).await?;
    w.write_all(value).await
}

/// Reads a length-framed raw byte string.
pub async fn read_bytes<R: AsyncRead + Unpin>(r: &mut R) -> io::Result<Vec<u8>> {
    let len = read_u64(r).await?;
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf).await?;
    Ok(buf)
}
