use super::error::Error;
use super::spec;
use deunicode::deunicode;
use std::io::prelude::*;
use std::net::{Shutdown, TcpStream};
use std::str;
use std::time::Duration;

// Read data from the socket in chunks this size.
const READ_BUFSIZE: usize = 256;

/// Manages a TCP stream carrying SIP frames and handles raw frame
/// sending and receiving.
///
/// Frames cross this boundary unparsed: checksums cover the exact
/// bytes on the wire, so verification and parsing happen upstream,
/// after the frame text is extracted here.
pub struct Connection {
    stream: TcpStream,

    // If set, non-ASCII chars are transliterated out of outbound
    // frames.
    ascii: bool,

    // Bytes read off the socket but not yet consumed as a frame.
    buffer: Vec<u8>,
}

impl Connection {
    pub fn from_stream(stream: TcpStream) -> Self {
        Connection {
            stream,
            ascii: false,
            buffer: Vec::new(),
        }
    }

    pub fn set_ascii(&mut self, ascii: bool) {
        self.ascii = ascii;
    }

    /// Shutdown the TCP stream.
    pub fn disconnect(&self) -> Result<(), Error> {
        log::debug!("Connection::disconnect()");

        match self.stream.shutdown(Shutdown::Both) {
            Ok(_) => Ok(()),
            Err(s) => {
                log::error!("disconnect() failed: {}", s);
                Err(Error::NetworkError)
            }
        }
    }

    /// Receive one frame, stripped of its terminator.
    ///
    /// Blocks for up to `timeout` seconds (indefinitely when zero) and
    /// returns Ok(None) if no complete frame arrived in time, so the
    /// caller can check for shutdown and try again.  Returns
    /// Err(NoResponseError) when the peer has closed the stream.
    pub fn recv_frame(&mut self, timeout: u64) -> Result<Option<String>, Error> {
        let duration = match timeout {
            0 => None,
            t => Some(Duration::from_secs(t)),
        };

        if let Err(e) = self.stream.set_read_timeout(duration) {
            log::error!("Invalid read timeout: {timeout} {e}");
            return Err(Error::NetworkError);
        }

        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\r') {
                let mut frame_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
                frame_bytes.pop(); // terminator

                let frame = match str::from_utf8(&frame_bytes) {
                    Ok(s) => s.trim_matches(|c| c == '\r' || c == '\n'),
                    Err(e) => {
                        log::error!("recv_frame() got non-utf8 data: {e}");
                        return Err(Error::MessageFormatError);
                    }
                };

                if frame.is_empty() {
                    // Blank line, e.g. from a \r\n-sending client.
                    continue;
                }

                // Frame text may carry a patron password; the session
                // layer logs the redacted form at info.
                log::trace!("INBOUND: {frame}");
                return Ok(Some(frame.to_string()));
            }

            let mut buf: [u8; READ_BUFSIZE] = [0; READ_BUFSIZE];

            let num_bytes = match self.stream.read(&mut buf) {
                Ok(num) => num,
                Err(e) => match e.kind() {
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                        return Ok(None);
                    }
                    _ => {
                        log::error!("recv_frame() failed: {e}");
                        return Err(Error::NetworkError);
                    }
                },
            };

            if num_bytes == 0 {
                // Peer closed the stream.  There is no disconnect
                // message in SIP -- the socket just ends.
                return Err(Error::NoResponseError);
            }

            self.buffer.extend_from_slice(&buf[..num_bytes]);
        }
    }

    /// Send one frame, appending the terminator.
    pub fn send_frame(&mut self, frame: &str) -> Result<(), Error> {
        let mut out = frame.to_string() + spec::LINE_TERMINATOR;

        if self.ascii {
            // "Some transliterations do produce \n characters."
            out = deunicode(&out).replace('\n', "");
        }

        match self.stream.write_all(out.as_bytes()) {
            Ok(_) => Ok(()),
            Err(s) => {
                log::error!("send_frame() failed: {}", s);
                Err(Error::NetworkError)
            }
        }
    }
}
