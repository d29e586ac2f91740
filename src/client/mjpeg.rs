//! Incremental decoder for `multipart/x-mixed-replace` camera streams
//!
//! The backend writes each frame as
//!
//! ```text
//! --frame\r\n
//! Content-Type: image/jpeg\r\n
//! \r\n
//! <jpeg bytes>\r\n
//! ```
//!
//! without `Content-Length` headers, so a frame is only complete once the
//! next delimiter (or the end of the body) has been seen. Chunks may split the
//! stream anywhere, including inside a delimiter.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Upper bound on buffered bytes while waiting for a delimiter
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

const HEADER_END: &[u8] = b"\r\n\r\n";
const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MjpegError {
    #[error("content type '{0}' has no multipart boundary")]
    MissingBoundary(String),

    #[error("frame exceeds {limit} bytes without a delimiter")]
    FrameTooLarge { limit: usize },

    #[error("part is missing its header block")]
    MalformedPart,
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Frame {
    /// True when the payload starts with a JPEG SOI marker
    pub fn is_jpeg(&self) -> bool {
        self.data.starts_with(&[0xFF, 0xD8])
    }
}

fn boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)boundary\s*=\s*(?:"([^"]+)"|([^;\s]+))"#)
            .expect("boundary pattern is valid")
    })
}

/// Extract the boundary token from a multipart content type
pub fn parse_boundary(content_type: &str) -> Option<String> {
    let caps = boundary_regex().captures(content_type)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim_start_matches("--").to_string())
        .filter(|b| !b.is_empty())
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[derive(Debug)]
pub struct MjpegDecoder {
    delimiter: Vec<u8>,
    buf: Vec<u8>,
    /// Where the search for the closing delimiter of the buffered part resumes
    scanned: usize,
    started: bool,
    max_frame_bytes: usize,
}

impl MjpegDecoder {
    pub fn new(boundary: &str) -> Self {
        Self {
            delimiter: format!("--{}", boundary).into_bytes(),
            buf: Vec::new(),
            scanned: 0,
            started: false,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }

    /// Build a decoder from a `Content-Type` header value
    pub fn from_content_type(content_type: &str) -> Result<Self, MjpegError> {
        parse_boundary(content_type)
            .map(|b| Self::new(&b))
            .ok_or_else(|| MjpegError::MissingBoundary(content_type.to_string()))
    }

    pub fn with_max_frame_bytes(mut self, limit: usize) -> Self {
        self.max_frame_bytes = limit;
        self
    }

    /// Feed a chunk and return every frame it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Frame>, MjpegError> {
        self.buf.extend_from_slice(chunk);
        let mut frames = Vec::new();

        loop {
            if !self.started {
                match find(&self.buf, &self.delimiter, 0) {
                    Some(pos) => {
                        self.buf.drain(..pos);
                        self.started = true;
                    }
                    None => {
                        // Preamble; keep a tail that may hold a split delimiter
                        let keep = self.delimiter.len().saturating_sub(1);
                        let cut = self.buf.len().saturating_sub(keep);
                        self.buf.drain(..cut);
                        break;
                    }
                }
            }

            let from = self.scanned.max(self.delimiter.len());
            let Some(next) = find(&self.buf, &self.delimiter, from) else {
                // a delimiter split across chunks starts in the last len - 1 bytes
                let tail = self.delimiter.len().saturating_sub(1);
                self.scanned = self.buf.len().saturating_sub(tail);
                if self.buf.len() > self.max_frame_bytes {
                    return Err(MjpegError::FrameTooLarge {
                        limit: self.max_frame_bytes,
                    });
                }
                break;
            };

            if let Some(frame) = parse_part(&self.buf[self.delimiter.len()..next])? {
                frames.push(frame);
            }
            self.buf.drain(..next);
            self.scanned = 0;
        }

        Ok(frames)
    }

    /// Flush the last part once the body has ended
    pub fn finish(&mut self) -> Option<Frame> {
        if !self.started || self.buf.len() <= self.delimiter.len() {
            return None;
        }
        self.scanned = 0;
        let part: Vec<u8> = self.buf.drain(..).skip(self.delimiter.len()).collect();
        parse_part(&part).ok().flatten()
    }
}

/// Parse the bytes between two delimiters; `None` for the closing delimiter or an empty body
fn parse_part(part: &[u8]) -> Result<Option<Frame>, MjpegError> {
    if part.starts_with(b"--") {
        return Ok(None);
    }
    let part = part.strip_prefix(CRLF).unwrap_or(part);

    let header_end = find(part, HEADER_END, 0)
        .map(|p| (p, HEADER_END.len()))
        .or_else(|| part.starts_with(CRLF).then_some((0, CRLF.len())))
        .ok_or(MjpegError::MalformedPart)?;

    let headers = String::from_utf8_lossy(&part[..header_end.0]);
    let content_type = headers.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-type")
            .then(|| value.trim().to_string())
    });

    let body = &part[header_end.0 + header_end.1..];
    let body = body.strip_suffix(CRLF).unwrap_or(body);
    if body.is_empty() {
        return Ok(None);
    }

    Ok(Some(Frame {
        content_type,
        data: body.to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(jpeg: &[u8]) -> Vec<u8> {
        let mut out = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        out.extend_from_slice(jpeg);
        out.extend_from_slice(b"\r\n");
        out
    }

    #[test]
    fn test_parse_boundary() {
        assert_eq!(
            parse_boundary("multipart/x-mixed-replace; boundary=frame").as_deref(),
            Some("frame")
        );
        assert_eq!(
            parse_boundary("multipart/x-mixed-replace;boundary=\"--myboundary\"").as_deref(),
            Some("myboundary")
        );
        assert!(parse_boundary("image/jpeg").is_none());
        assert!(matches!(
            MjpegDecoder::from_content_type("image/jpeg"),
            Err(MjpegError::MissingBoundary(_))
        ));
    }

    #[test]
    fn test_frames_complete_on_next_delimiter() {
        let mut stream = part(&[0xFF, 0xD8, 1, 2, 0xFF, 0xD9]);
        stream.extend(part(&[0xFF, 0xD8, 3, 0xFF, 0xD9]));

        let mut decoder = MjpegDecoder::new("frame");
        let frames = decoder.feed(&stream).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_jpeg());
        assert_eq!(frames[0].content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(frames[0].data, vec![0xFF, 0xD8, 1, 2, 0xFF, 0xD9]);

        let last = decoder.finish().unwrap();
        assert_eq!(last.data, vec![0xFF, 0xD8, 3, 0xFF, 0xD9]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut stream = b"preamble\r\n".to_vec();
        for i in 0..3u8 {
            stream.extend(part(&[0xFF, 0xD8, i, 0xFF, 0xD9]));
        }
        stream.extend_from_slice(b"--frame--\r\n");

        let mut decoder = MjpegDecoder::new("frame");
        let mut frames = Vec::new();
        for byte in &stream {
            frames.extend(decoder.feed(std::slice::from_ref(byte)).unwrap());
        }
        frames.extend(decoder.finish());

        let payloads: Vec<u8> = frames.iter().map(|f| f.data[2]).collect();
        assert_eq!(payloads, vec![0, 1, 2]);
    }

    #[test]
    fn test_large_frame_in_small_chunks() {
        let mut decoder = MjpegDecoder::new("frame");
        decoder.feed(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n\xFF\xD8").unwrap();

        for _ in 0..4096 {
            assert!(decoder.feed(&[0xAB; 16]).unwrap().is_empty());
            assert_eq!(decoder.scanned, decoder.buf.len() - 6);
        }

        // next delimiter split across two chunks
        assert!(decoder.feed(b"\r\n--fr").unwrap().is_empty());
        let frames = decoder.feed(b"ame\r\n").unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data.len(), 2 + 4096 * 16);
        assert!(frames[0].is_jpeg());
        // only the new delimiter is left, scanned afresh
        assert_eq!(decoder.buf, b"--frame\r\n");
        assert_eq!(decoder.scanned, 3);
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let mut decoder = MjpegDecoder::new("frame").with_max_frame_bytes(64);
        decoder.feed(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n").unwrap();
        let err = decoder.feed(&[0u8; 100]).unwrap_err();
        assert_eq!(err, MjpegError::FrameTooLarge { limit: 64 });
    }

    #[test]
    fn test_malformed_part() {
        let mut decoder = MjpegDecoder::new("frame");
        let err = decoder
            .feed(b"--frame\r\nContent-Type: image/jpeg no blank line--frame\r\n")
            .unwrap_err();
        assert_eq!(err, MjpegError::MalformedPart);
    }
}
