use crate::server::api::{self, ApiError, ApiState};

const KNOWN_ROUTES: &[&str] = &[
    "/api/health",
    "/api/dataset",
    "/api/units",
    "/api/facets",
    "/api/price-tables",
    "/api/valuation",
];

#[derive(Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    /// Status line, headers and body, ready to write to the socket.
    pub fn to_http_string(&self) -> String {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status_code, self.status_text);
        for (name, value) in [
            ("Content-Type", self.content_type.to_string()),
            ("Content-Length", self.body.len().to_string()),
            ("Connection", "close".to_string()),
        ] {
            out.push_str(&format!("{name}: {value}\r\n"));
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out
    }

    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }

    fn error(status_code: u16, status_text: &'static str, message: &str) -> Self {
        let body = serde_json::to_string_pretty(&serde_json::json!({
            "status": "error",
            "message": message,
        }))
        .unwrap_or_else(|_| "{\"status\": \"error\"}".to_string());

        Self {
            status_code,
            status_text,
            ..Self::ok(body)
        }
    }
}

impl From<Result<String, ApiError>> for HttpResponse {
    fn from(result: Result<String, ApiError>) -> Self {
        let err = match result {
            Ok(payload) => return Self::ok(payload),
            Err(err) => err,
        };
        let (code, text) = match err {
            ApiError::Parse(_) | ApiError::Validation(_) => (400, "Bad Request"),
            ApiError::Load(_) => (503, "Service Unavailable"),
            ApiError::Encode(_) => (500, "Internal Server Error"),
        };
        Self::error(code, text, &err.to_string())
    }
}

pub fn route_request(state: &ApiState, method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split_once('?').map_or(path, |(route, _)| route);
    let result = match (method, route) {
        ("GET", "/api/health") => api::health_payload(),
        ("GET", "/api/dataset") => api::dataset_payload(state),
        ("GET", "/api/units") => api::units_payload(state, path),
        ("GET", "/api/facets") => api::facets_payload(state),
        ("GET", "/api/price-tables") => api::price_tables_payload(state),
        ("POST", "/api/valuation") => api::valuation_payload(state, body),
        _ if KNOWN_ROUTES.contains(&route) => {
            return HttpResponse::error(405, "Method Not Allowed", "Method not allowed")
        }
        _ => return HttpResponse::error(404, "Not Found", "Route not found"),
    };
    result.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_has_length_and_close() {
        let response = HttpResponse::ok("{}".to_string());
        assert_eq!(
            response.to_http_string(),
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}"
        );
    }

    #[test]
    fn errors_map_to_status_codes() {
        let bad = HttpResponse::from(Err::<String, _>(ApiError::Validation("top must be positive".to_string())));
        assert_eq!(bad.status_code, 400);
        assert!(bad.body.contains("top must be positive"));

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(HttpResponse::from(Err::<String, _>(ApiError::Parse(parse_err))).status_code, 400);
    }
}
