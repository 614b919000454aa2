//! Response classification shared by the reqwest adapters.

use reqwest::StatusCode;

/// Coarse category of a failed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureClass {
    RateLimited,
    Timeout,
    Unauthorized,
    InvalidRequest,
    Transport,
}

/// Classify a non-success status.
pub(crate) fn classify_status(status: StatusCode) -> FailureClass {
    match status {
        StatusCode::TOO_MANY_REQUESTS => FailureClass::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => FailureClass::Timeout,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureClass::Unauthorized,
        _ if status.is_client_error() => FailureClass::InvalidRequest,
        _ => FailureClass::Transport,
    }
}

/// Classify a transport-level reqwest failure.
pub(crate) fn classify_transport(error: &reqwest::Error) -> FailureClass {
    if error.is_timeout() {
        FailureClass::Timeout
    } else {
        FailureClass::Transport
    }
}

/// `status N` or `status N: <preview>`.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

/// Whitespace-compacted body, cut at 160 characters.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, FailureClass::RateLimited)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, FailureClass::Timeout)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, FailureClass::Timeout)]
    #[case::forbidden(StatusCode::FORBIDDEN, FailureClass::Unauthorized)]
    #[case::bad_request(StatusCode::BAD_REQUEST, FailureClass::InvalidRequest)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, FailureClass::Transport)]
    fn classifies_statuses(#[case] status: StatusCode, #[case] expected: FailureClass) {
        assert_eq!(classify_status(status), expected);
    }

    #[rstest]
    fn preview_compacts_and_truncates() {
        let body = format!("  a\n\tb {}", "x".repeat(200));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("a b x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    fn empty_bodies_report_only_the_status() {
        assert_eq!(status_message(StatusCode::BAD_GATEWAY, b" \n"), "status 502");
    }
}
