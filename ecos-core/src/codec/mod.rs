//! Newline-delimited text framing for the ECoS console.
//!
//! Every request and every reply line is UTF-8 text terminated by `\n`.
//! A trailing `\r` is stripped so consoles that send CRLF decode the same.
//!
//! A line longer than [`MAX_LINE_LENGTH`] is cut: the first
//! `MAX_LINE_LENGTH` bytes are kept, the rest is dropped up to and
//! including its newline, and the truncated line is handed out as usual.
//! Decoding never fails on length, so the stream stays aligned on line
//! boundaries and later replies still reach their own requests.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::EcosError;

/// Upper bound on a single line, guarding against a peer that never
/// sends a newline.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct EcosCodec {
    // Bytes already scanned for '\n' in the current buffer.
    scanned: usize,
    // Kept prefix of an overlong line whose tail is being dropped.
    truncated: Option<BytesMut>,
    // Bytes dropped from that line so far.
    dropped: usize,
}

impl EcosCodec {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_line(buf: BytesMut) -> String {
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        if line.ends_with('\r') {
            line.pop();
        }
        line
    }

    fn finish_truncated(&mut self) -> Option<String> {
        let prefix = self.truncated.take()?;
        warn!(
            "line longer than {MAX_LINE_LENGTH} bytes; dropped {} bytes",
            self.dropped
        );
        self.dropped = 0;
        Some(Self::take_line(prefix))
    }
}

impl Decoder for EcosCodec {
    type Item = String;
    type Error = EcosError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.truncated.is_some() {
            return match src.iter().position(|b| *b == b'\n') {
                Some(offset) => {
                    self.dropped += offset;
                    src.advance(offset + 1);
                    Ok(self.finish_truncated())
                }
                None => {
                    self.dropped += src.len();
                    src.clear();
                    Ok(None)
                }
            };
        }

        match src[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = self.scanned + offset;
                self.scanned = 0;
                if end > MAX_LINE_LENGTH {
                    let line = src.split_to(end + 1);
                    self.truncated = Some(BytesMut::from(&line[..MAX_LINE_LENGTH]));
                    self.dropped = end - MAX_LINE_LENGTH;
                    return Ok(self.finish_truncated());
                }
                let mut line = src.split_to(end + 1);
                line.truncate(end);
                Ok(Some(Self::take_line(line)))
            }
            None if src.len() > MAX_LINE_LENGTH => {
                // Keep the prefix, drop the rest until the newline shows up.
                self.scanned = 0;
                self.truncated = Some(src.split_to(MAX_LINE_LENGTH));
                self.dropped = src.len();
                src.clear();
                Ok(None)
            }
            None => {
                self.scanned = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if let Some(line) = self.finish_truncated() {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // Unterminated last line: hand it out like a normal one.
        self.scanned = 0;
        let rest = src.split_to(src.len());
        Ok(Some(Self::take_line(rest)))
    }
}

impl<T: AsRef<str>> Encoder<T> for EcosCodec {
    type Error = EcosError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = item.as_ref();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tokio_util::codec::FramedRead;

    #[test]
    fn decodes_lines_and_strips_cr() {
        let mut codec = EcosCodec::new();
        let mut buf = BytesMut::from(&b"<REPLY get(1, status)>\r\n1 status[GO]\n<EN"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap().as_deref(),
            Some("<REPLY get(1, status)>")
        );
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("1 status[GO]"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"D 0 (OK)>\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("<END 0 (OK)>"));
        assert!(buf.is_empty());
    }

    #[test]
    fn eof_yields_unterminated_fragment() {
        let mut codec = EcosCodec::new();
        let mut buf = BytesMut::from(&b"1000 speed[12]"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap().as_deref(),
            Some("1000 speed[12]")
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn oversized_line_is_truncated_across_chunks() {
        let mut codec = EcosCodec::new();
        let mut buf = BytesMut::from(vec![b'x'; MAX_LINE_LENGTH + 10].as_slice());
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(&[b'y'; 4096]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"yy\n<END 0 (OK)>\n");
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LENGTH);
        assert!(line.bytes().all(|b| b == b'x'));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("<END 0 (OK)>"));
    }

    #[test]
    fn oversized_line_in_one_chunk() {
        let mut codec = EcosCodec::new();
        let mut data = vec![b'z'; MAX_LINE_LENGTH + 1];
        data.extend_from_slice(b"\n1 status[GO]\n");
        let mut buf = BytesMut::from(data.as_slice());

        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LENGTH);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("1 status[GO]"));
    }

    #[test]
    fn oversized_fragment_at_eof() {
        let mut codec = EcosCodec::new();
        let mut buf = BytesMut::from(vec![b'x'; MAX_LINE_LENGTH + 5].as_slice());
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        let line = codec.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LENGTH);
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }

    #[test]
    fn encode_appends_newline() {
        let mut codec = EcosCodec::new();
        let mut dst = BytesMut::new();
        codec.encode("set(1000, speed[7])", &mut dst).unwrap();
        assert_eq!(&dst[..], b"set(1000, speed[7])\n");
    }

    #[tokio::test]
    async fn framed_read_over_mock_stream() {
        let mock = tokio_test::io::Builder::new()
            .read(b"<REPLY queryObjects(10)>\n1000\n")
            .read(b"1001\n<END 0 (OK)>\n")
            .build();
        let mut lines = FramedRead::new(mock, EcosCodec::new());

        let mut seen = Vec::new();
        while let Some(line) = lines.next().await {
            seen.push(line.unwrap());
        }
        assert_eq!(
            seen,
            vec!["<REPLY queryObjects(10)>", "1000", "1001", "<END 0 (OK)>"]
        );
    }
}
