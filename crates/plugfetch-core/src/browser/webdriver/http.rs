//! Blocking JSON calls to a WebDriver endpoint over libcurl.
//!
//! Runs in the current thread; call from `spawn_blocking` if used from async code.

use serde_json::Value;
use std::time::Duration;

use super::super::BrowserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Perform one command and return its `value` member.
pub(crate) fn call(
    method: Method,
    url: &str,
    body: Option<&Value>,
    timeout: Duration,
) -> Result<Value, BrowserError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.custom_request(method.as_str())?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json; charset=utf-8")?;
    easy.http_headers(list)?;

    if let Some(body) = body {
        let payload =
            serde_json::to_vec(body).map_err(|e| BrowserError::Protocol(e.to_string()))?;
        easy.post_fields_copy(&payload)?;
    }

    let mut response = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            response.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    parse_response(code, &response)
}

/// Unwrap `{"value": ...}`, turning WebDriver error objects into `BrowserError::WebDriver`.
pub(crate) fn parse_response(code: u32, body: &[u8]) -> Result<Value, BrowserError> {
    let success = (200..300).contains(&code);
    if body.is_empty() {
        return if success {
            Ok(Value::Null)
        } else {
            Err(BrowserError::Protocol(format!("HTTP {code} with empty body")))
        };
    }

    let json: Value = serde_json::from_slice(body).map_err(|e| {
        BrowserError::Protocol(format!("HTTP {code}: body is not JSON ({e})"))
    })?;
    let value = json.get("value").cloned().unwrap_or(Value::Null);

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(BrowserError::WebDriver {
            error: error.to_string(),
            message: message.to_string(),
        });
    }
    if !success {
        return Err(BrowserError::Protocol(format!("HTTP {code}: {json}")));
    }
    Ok(value)
}
