use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{info, warn};

pub mod api;
pub mod routes;

pub use api::ApiState;

const MAX_REQUEST_BYTES: usize = 16_384;

/// Serve requests one at a time until the listener fails.
pub fn run_server(bind_addr: &str, state: &ApiState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!("warvalue server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, state) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

/// Method, target and body of a single buffered request.
#[derive(Debug, PartialEq, Eq)]
struct Request<'a> {
    method: &'a str,
    target: &'a str,
    body: &'a str,
}

fn parse_request(raw: &str) -> Request<'_> {
    let (head, body) = raw
        .split_once("\r\n\r\n")
        .or_else(|| raw.split_once("\n\n"))
        .unwrap_or((raw, ""));
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    Request {
        method: request_line.next().unwrap_or("GET"),
        target: request_line.next().unwrap_or("/"),
        body,
    }
}

fn handle_connection(stream: &mut TcpStream, state: &ApiState) -> std::io::Result<()> {
    let mut buffer = vec![0_u8; MAX_REQUEST_BYTES];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let raw = String::from_utf8_lossy(&buffer[..bytes_read]);
    let request = parse_request(&raw);
    let response = routes::route_request(state, request.method, request.target, request.body);
    info!(
        method = request.method,
        target = request.target,
        status = response.status_code,
        "handled request"
    );
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_and_body_are_split() {
        let request = parse_request(
            "POST /api/valuation HTTP/1.1\r\nHost: localhost\r\nContent-Length: 9\r\n\r\n{\"top\":3}",
        );
        assert_eq!(
            request,
            Request {
                method: "POST",
                target: "/api/valuation",
                body: "{\"top\":3}",
            }
        );
    }

    #[test]
    fn bare_newlines_and_missing_parts_fall_back() {
        let request = parse_request("GET /api/units?slot=Core\n\n");
        assert_eq!(request.target, "/api/units?slot=Core");
        assert_eq!(request.body, "");

        let empty = parse_request("");
        assert_eq!((empty.method, empty.target, empty.body), ("GET", "/", ""));
    }
}
