//! Up-front checks run on every input before a transfer is registered.
use crate::error::FetchError;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

/// An input that parsed, answered, and declared its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedLink {
    /// The input string, unchanged.
    pub link: String,
    pub size: u64,
}

/// Parses `link` as an absolute URL with a scheme and a host.
pub fn parse_link(link: &str) -> Result<Url, FetchError> {
    let url = Url::parse(link).map_err(|e| FetchError::MalformedUrl(e.to_string()))?;
    if url.host().is_none() {
        return Err(FetchError::MalformedUrl("URL has no host".into()));
    }
    Ok(url)
}

/// Checks that `link` is well formed, reachable, and reports its size.
///
/// Uses a GET rather than a HEAD, since not every server answers HEAD. The
/// body is never read; dropping the response closes the connection.
pub async fn validate(link: &str, client: &Client) -> Result<AcceptedLink, FetchError> {
    let url = parse_link(link)?;

    let response = send(client, url).await?;
    let size = content_length(response.headers())?;
    debug!(link, size, "accepted");

    Ok(AcceptedLink {
        link: link.to_string(),
        size,
    })
}

/// Sends a GET and rejects non-success statuses.
pub(crate) async fn send(client: &Client, url: Url) -> Result<Response, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Connection(format!(
            "request failed with status {}",
            response.status()
        )));
    }
    Ok(response)
}

/// Reads the declared `Content-Length` from response headers.
pub fn content_length(headers: &HeaderMap) -> Result<u64, FetchError> {
    let value = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| FetchError::SizeUnknown {
            header: None,
            reason: "missing Content-Length header".into(),
        })?;

    let text = value.to_str().map_err(|e| FetchError::SizeUnknown {
        header: None,
        reason: e.to_string(),
    })?;

    text.trim()
        .parse::<u64>()
        .map_err(|e| FetchError::SizeUnknown {
            header: Some(text.to_string()),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn rejects_relative_and_hostless_links() {
        assert!(matches!(
            parse_link("not a url"),
            Err(FetchError::MalformedUrl(_))
        ));
        assert!(matches!(
            parse_link("/files/a.zip"),
            Err(FetchError::MalformedUrl(_))
        ));
        assert!(matches!(
            parse_link("mailto:someone@example.test"),
            Err(FetchError::MalformedUrl(_))
        ));
    }

    #[test]
    fn accepts_absolute_links() {
        let url = parse_link("https://example.test/a.zip").unwrap();
        assert_eq!(url.host_str(), Some("example.test"));
    }

    #[test]
    fn reads_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("1000"));
        assert_eq!(content_length(&headers).unwrap(), 1000);
    }

    #[test]
    fn missing_content_length_is_size_unknown() {
        let headers = HeaderMap::new();
        assert!(matches!(
            content_length(&headers),
            Err(FetchError::SizeUnknown { header: None, .. })
        ));
    }

    #[test]
    fn negative_content_length_is_size_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("-5"));
        match content_length(&headers) {
            Err(FetchError::SizeUnknown { header, .. }) => {
                assert_eq!(header.as_deref(), Some("-5"))
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_error() {
        let client = Client::new();
        // port 1 is reserved and nothing listens there
        let result = validate("http://127.0.0.1:1/a.zip", &client).await;
        assert!(matches!(result, Err(FetchError::Connection(_))));
    }
}
