use reqwest::Response;

/// Client-side API failures.
///
/// `UnexpectedStatus` keeps the raw response body so a failed assertion can
/// show what the server actually said.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("no auth token held; register or login first")]
    NotAuthenticated,
}

/// Pass the response through when its status matches, otherwise capture
/// status + body as an [`ApiError::UnexpectedStatus`].
pub(crate) async fn expect_status(
    response: Response,
    expected: reqwest::StatusCode,
) -> Result<Response, ApiError> {
    if response.status() == expected {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::UnexpectedStatus { status, body })
}
