//! Reading resource text.
//!
//! Streams are line-read and reassembled with the platform line separator,
//! so `"a\r\nb"`, `"a\nb"` and `"a\rb"` read back identically. Bytes that
//! are not valid UTF-8 decode to U+FFFD instead of failing the read.
//!
//! | Scheme           | Opened with                      |
//! |------------------|----------------------------------|
//! | `file`           | [`File`]                         |
//! | `http`, `https`  | blocking `reqwest` GET           |
//! | anything else    | [`io::ErrorKind::Unsupported`]   |

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::ReadError;
use crate::locator::Locator;
use crate::log;

/// Line separator used when reassembling text.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Timeout for fetching `http:` and `https:` locators.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An open resource with an explicit close step.
///
/// `close` consumes the stream, so it runs at most once. Dropping without
/// calling it still releases the handle but loses any close error.
pub trait ResourceStream: BufRead {
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Read> ResourceStream for BufReader<R> {}

/// Open the stream behind a locator.
///
/// `file:` locators open the file, `http:` and `https:` locators are fetched.
/// Other schemes fail with [`io::ErrorKind::Unsupported`].
pub fn open_stream(locator: &Locator) -> io::Result<Box<dyn ResourceStream>> {
    match locator.scheme() {
        "file" => {
            let path = locator.to_file_path().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("`{locator}` is not a local file"),
                )
            })?;
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
        "http" | "https" => open_http(&http_client()?, locator),
        scheme => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot open `{scheme}:` locators"),
        )),
    }
}

fn http_client() -> io::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("resloc/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(io::Error::other)
}

/// GET `locator` and stream the response body.
///
/// Non-success statuses fail to open; 404 maps to [`io::ErrorKind::NotFound`].
fn open_http(client: &Client, locator: &Locator) -> io::Result<Box<dyn ResourceStream>> {
    let response = client
        .get(locator.as_str())
        .send()
        .map_err(io::Error::other)?;

    let status = response.status();
    if !status.is_success() {
        let kind = if status == StatusCode::NOT_FOUND {
            io::ErrorKind::NotFound
        } else {
            io::ErrorKind::Other
        };
        return Err(io::Error::new(kind, format!("HTTP {status} for {locator}")));
    }

    Ok(Box::new(BufReader::new(response)))
}

/// Read the full text of a resource.
///
/// # Errors
///
/// - [`ReadError::Open`] if the stream cannot be opened
/// - [`ReadError::Read`] if reading fails partway
pub fn read_text(locator: &Locator) -> Result<String, ReadError> {
    let stream = open_stream(locator).map_err(|source| {
        log!("error"; "cannot open [{}]: {}", locator, source);
        ReadError::Open {
            locator: locator.clone(),
            source,
        }
    })?;
    read_stream_text(locator, stream)
}

/// Read an already open stream to the end, then close it.
///
/// The stream is closed on every path. A close failure is logged and never
/// replaces a read error.
pub fn read_stream_text(
    locator: &Locator,
    mut stream: Box<dyn ResourceStream>,
) -> Result<String, ReadError> {
    let result = read_lines(&mut *stream).map_err(|source| {
        log!("error"; "error reading text from [{}]: {}", locator, source);
        ReadError::Read {
            locator: locator.clone(),
            source,
        }
    });

    if let Err(e) = stream.close() {
        log!("error"; "error closing after reading text from [{}]: {}", locator, e);
    }

    result
}

/// Split on `\n`, `\r\n` or a lone `\r`, appending [`LINE_SEPARATOR`] to
/// every line.
fn read_lines<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut buf = String::new();
    let mut chunk = Vec::new();

    loop {
        chunk.clear();
        if reader.read_until(b'\n', &mut chunk)? == 0 {
            break;
        }

        let newline = chunk.last() == Some(&b'\n');
        if newline {
            chunk.pop();
            if chunk.last() == Some(&b'\r') {
                chunk.pop();
            }
        }

        // every `\r` left in the chunk ends a line of its own
        let mut lines = chunk.split(|&b| b == b'\r').peekable();
        while let Some(line) = lines.next() {
            let last = lines.peek().is_none();
            if last && !newline && line.is_empty() {
                break;
            }
            buf.push_str(&String::from_utf8_lossy(line));
            buf.push_str(LINE_SEPARATOR);
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use tempfile::TempDir;

    /// Yields its content, then fails every further read.
    struct FailingStream {
        inner: Cursor<Vec<u8>>,
        closed: Arc<AtomicBool>,
        fail_close: bool,
    }

    impl FailingStream {
        fn new(content: &str, fail_close: bool) -> (Box<Self>, Arc<AtomicBool>) {
            let closed = Arc::new(AtomicBool::new(false));
            let stream = Box::new(Self {
                inner: Cursor::new(content.as_bytes().to_vec()),
                closed: Arc::clone(&closed),
                fail_close,
            });
            (stream, closed)
        }

        fn exhausted(&self) -> bool {
            self.inner.position() as usize >= self.inner.get_ref().len()
        }
    }

    impl Read for FailingStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.exhausted() {
                return Err(io::Error::other("connection reset"));
            }
            self.inner.read(buf)
        }
    }

    impl BufRead for FailingStream {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.exhausted() {
                return Err(io::Error::other("connection reset"));
            }
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
        }
    }

    impl ResourceStream for FailingStream {
        fn close(self: Box<Self>) -> io::Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            if self.fail_close {
                Err(io::Error::other("close failed"))
            } else {
                Ok(())
            }
        }
    }

    fn locator() -> Locator {
        Locator::parse("file:///virtual/stream.properties").unwrap()
    }

    #[test]
    fn test_read_text_appends_separator_to_every_line() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ab.properties");
        fs::write(&file, "a\nb").unwrap();

        let text = read_text(&Locator::from_file_path(&file).unwrap()).unwrap();
        assert_eq!(text, format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}"));
    }

    #[test]
    fn test_read_text_normalizes_crlf() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("crlf.properties");
        fs::write(&file, "a\r\nb\r\n").unwrap();

        let text = read_text(&Locator::from_file_path(&file).unwrap()).unwrap();
        assert_eq!(text, format!("a{LINE_SEPARATOR}b{LINE_SEPARATOR}"));
    }

    #[test]
    fn test_read_text_empty_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("empty.properties");
        fs::write(&file, "").unwrap();

        let text = read_text(&Locator::from_file_path(&file).unwrap()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_read_text_missing_file_is_open_error() {
        let dir = TempDir::new().unwrap();
        let locator = Locator::from_file_path(&dir.path().join("missing")).unwrap();

        let err = read_text(&locator).unwrap_err();
        assert!(matches!(err, ReadError::Open { .. }));
        assert_eq!(err.locator(), &locator);
    }

    #[test]
    fn test_read_text_unsupported_scheme() {
        let locator = Locator::parse("ftp://example.com/app.properties").unwrap();

        match read_text(&locator).unwrap_err() {
            ReadError::Open { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::Unsupported);
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_text_invalid_utf8_is_replaced() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("latin1.properties");
        fs::write(&file, b"name=caf\xE9\n").unwrap();

        let text = read_text(&Locator::from_file_path(&file).unwrap()).unwrap();
        assert_eq!(text, format!("name=caf\u{FFFD}{LINE_SEPARATOR}"));
    }

    #[test]
    fn test_read_lines_splits_on_lone_cr() {
        let cases: &[(&[u8], &[&str])] = &[
            (b"a\rb\r", &["a", "b"]),
            (b"a\rb", &["a", "b"]),
            (b"a\r\r\nb", &["a", "", "b"]),
            (b"a\n\nb\n", &["a", "", "b"]),
            (b"\r", &[""]),
            (b"\r\n", &[""]),
        ];

        for (input, lines) in cases {
            let expected: String = lines.iter().map(|l| format!("{l}{LINE_SEPARATOR}")).collect();
            let text = read_lines(&mut Cursor::new(input.to_vec())).unwrap();
            assert_eq!(text, expected, "input {:?}", String::from_utf8_lossy(input));
        }
    }

    /// Serve one request on a local port and return its base URL.
    fn serve_once(status: u16, body: &'static [u8]) -> (String, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = tiny_http::Response::from_data(body).with_status_code(status);
                request.respond(response).ok();
            }
        });
        (format!("http://{addr}"), handle)
    }

    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[test]
    fn test_http_stream_reads_body() {
        let (base, server) = serve_once(200, b"a=1\r\nb=caf\xE9");
        let locator = Locator::parse(&format!("{base}/app.properties")).unwrap();

        let stream = open_http(&local_client(), &locator).unwrap();
        let text = read_stream_text(&locator, stream).unwrap();
        assert_eq!(
            text,
            format!("a=1{LINE_SEPARATOR}b=caf\u{FFFD}{LINE_SEPARATOR}")
        );
        server.join().unwrap();
    }

    #[test]
    fn test_http_not_found_fails_to_open() {
        let (base, server) = serve_once(404, b"missing");
        let locator = Locator::parse(&format!("{base}/missing.properties")).unwrap();

        let err = open_http(&local_client(), &locator).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        server.join().unwrap();
    }

    /// Well-behaved stream that records its close call.
    struct TrackedStream {
        inner: Cursor<Vec<u8>>,
        closed: Arc<AtomicBool>,
        fail_close: bool,
    }

    impl Read for TrackedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl BufRead for TrackedStream {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.inner.consume(amt);
        }
    }

    impl ResourceStream for TrackedStream {
        fn close(self: Box<Self>) -> io::Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            if self.fail_close {
                Err(io::Error::other("close failed"))
            } else {
                Ok(())
            }
        }
    }

    fn tracked(content: &str, fail_close: bool) -> (Box<TrackedStream>, Arc<AtomicBool>) {
        let closed = Arc::new(AtomicBool::new(false));
        let stream = Box::new(TrackedStream {
            inner: Cursor::new(content.as_bytes().to_vec()),
            closed: Arc::clone(&closed),
            fail_close,
        });
        (stream, closed)
    }

    #[test]
    fn test_stream_closed_after_success() {
        let (stream, closed) = tracked("x=1\ny=2\n", false);

        let text = read_stream_text(&locator(), stream).unwrap();
        assert_eq!(text, format!("x=1{LINE_SEPARATOR}y=2{LINE_SEPARATOR}"));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_close_failure_after_success_keeps_text() {
        let (stream, closed) = tracked("x=1\n", true);

        let text = read_stream_text(&locator(), stream).unwrap();
        assert_eq!(text, format!("x=1{LINE_SEPARATOR}"));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stream_closed_when_read_fails_partway() {
        let (stream, closed) = FailingStream::new("a\n", false);

        let err = read_stream_text(&locator(), stream).unwrap_err();
        assert!(matches!(err, ReadError::Read { .. }));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_close_failure_does_not_mask_read_error() {
        let (stream, closed) = FailingStream::new("a\n", true);

        match read_stream_text(&locator(), stream).unwrap_err() {
            ReadError::Read { source, .. } => {
                assert_eq!(source.to_string(), "connection reset");
            }
            other => panic!("expected read error, got {other:?}"),
        }
        assert!(closed.load(Ordering::SeqCst));
    }
}
