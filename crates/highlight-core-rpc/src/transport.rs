//! Framed transport: the boundary a host process talks to.
//!
//! When the host drives the service over a pipe or socket rather than an
//! in-process call, each [`Request`] and [`Response`] travels as a UTF-8 JSON
//! body behind an HTTP-like length header:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```
//!
//! [`serve`] is the engine-side loop: it reads framed requests until EOF,
//! dispatches each one through a [`SearchService`], and writes the framed
//! response back. A request whose body is not valid JSON is answered with a
//! structured error response, not a dropped connection; the host always gets
//! an answer per request.

use crate::protocol::{Request, Response};
use crate::service::SearchService;
use highlight_core::Document;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, BufRead, ErrorKind, Write};

fn invalid_data(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, err)
}

fn write_frame<W: Write>(writer: &mut W, message: &impl Serialize) -> io::Result<()> {
    let body = serde_json::to_vec(message).map_err(invalid_data)?;
    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()
}

/// Read one framed body from `reader`.
///
/// `Ok(None)` means clean EOF before the next frame. A frame without a
/// parsable `Content-Length` header, or EOF inside a frame, is an
/// `InvalidData` / `UnexpectedEof` error.
fn read_frame<R: BufRead>(reader: &mut R) -> io::Result<Option<Vec<u8>>> {
    let mut declared: Option<usize> = None;
    let mut line = String::new();
    let mut saw_header = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return if saw_header {
                Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "EOF inside frame header",
                ))
            } else {
                Ok(None)
            };
        }
        saw_header = true;

        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            declared = value.trim().parse::<usize>().ok();
        }
    }

    let len = declared.ok_or_else(|| invalid_data("missing Content-Length header"))?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

/// Write one framed request (the host side of the wire).
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> io::Result<()> {
    write_frame(writer, request)
}

/// Write one framed response (the engine side of the wire).
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> io::Result<()> {
    write_frame(writer, response)
}

/// Read one framed response (the host side of the wire).
///
/// Returns `Ok(None)` on clean EOF.
pub fn read_response<R: BufRead>(reader: &mut R) -> io::Result<Option<Response>> {
    match read_frame(reader)? {
        Some(body) => serde_json::from_slice(&body).map(Some).map_err(invalid_data),
        None => Ok(None),
    }
}

/// Answer framed requests from `reader` on `writer` until EOF.
///
/// Each frame is dispatched against `service` and `doc` via
/// [`SearchService::handle_json`], so malformed requests come back as
/// `{ "success": false, "error": ... }` responses. Frames whose body is not
/// JSON at all get the same treatment. Returns when the request stream ends;
/// I/O failures on either side abort the loop.
pub fn serve<R: BufRead, W: Write>(
    service: &mut SearchService,
    doc: &mut Document,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<()> {
    while let Some(body) = read_frame(reader)? {
        let response = match serde_json::from_slice::<Value>(&body) {
            Ok(request) => service.handle_json(doc, request),
            Err(err) => {
                serde_json::to_value(Response::err(format!("invalid request: {err}")))
                    .map_err(invalid_data)?
            }
        };
        write_frame(writer, &response)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn page(text: &str) -> Document {
        let mut doc = Document::new();
        let t = doc.create_text(text);
        doc.append_child(doc.root(), t);
        doc
    }

    #[test]
    fn request_frames_round_trip_through_serve() {
        let mut doc = page("cat cats catalog");
        let mut service = SearchService::new();

        let mut input = Vec::new();
        write_request(
            &mut input,
            &Request::Search {
                text: "cat".to_string(),
                exact_match: true,
                use_morphology: false,
                use_regex: false,
            },
        )
        .unwrap();
        write_request(&mut input, &Request::Navigate { index: 1 }).unwrap();
        write_request(&mut input, &Request::Clear).unwrap();

        let mut output = Vec::new();
        serve(
            &mut service,
            &mut doc,
            &mut Cursor::new(input),
            &mut output,
        )
        .unwrap();

        let mut responses = Cursor::new(output);
        assert_eq!(
            read_response(&mut responses).unwrap().unwrap(),
            Response::with_count(3)
        );
        assert_eq!(read_response(&mut responses).unwrap().unwrap(), Response::ok());
        assert_eq!(read_response(&mut responses).unwrap().unwrap(), Response::ok());
        assert!(read_response(&mut responses).unwrap().is_none());
        assert_eq!(doc.text_content(), "cat cats catalog");
    }

    #[test]
    fn non_json_body_gets_structured_error_and_loop_continues() {
        let mut doc = page("cat");
        let mut service = SearchService::new();

        let mut input = Vec::new();
        let garbage = b"this is not json";
        write!(input, "Content-Length: {}\r\n\r\n", garbage.len()).unwrap();
        input.extend_from_slice(garbage);
        write_request(&mut input, &Request::Ping).unwrap();

        let mut output = Vec::new();
        serve(
            &mut service,
            &mut doc,
            &mut Cursor::new(input),
            &mut output,
        )
        .unwrap();

        let mut responses = Cursor::new(output);
        let first = read_response(&mut responses).unwrap().unwrap();
        assert!(!first.success);
        assert!(first.error.is_some());
        // The ping after the bad frame is still answered.
        assert_eq!(read_response(&mut responses).unwrap().unwrap(), Response::ok());
    }

    #[test]
    fn missing_content_length_is_invalid_data() {
        let mut reader = Cursor::new(b"X-Other: 1\r\n\r\n{}".to_vec());
        let err = read_frame(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn eof_inside_header_is_unexpected_eof() {
        let mut reader = Cursor::new(b"Content-Length: 5\r\n".to_vec());
        let err = read_frame(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
