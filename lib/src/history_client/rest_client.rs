//! The HTTP client that calls the Visual Crossing endpoint.
use reqwest::{
    blocking::{Client, Request, RequestBuilder},
    header::RETRY_AFTER,
    Url,
};
use std::time::Duration;

/// The request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The result of a request made by the Rest client.
///
/// The client classifies what happened, deciding what to do about it
/// belongs to the retry controller.
///
#[derive(Debug)]
pub enum RestClientResult {
    /// The body of a successful (2xx) response.
    Body(Vec<u8>),
    /// The request did not complete within the timeout.
    Timeout(String),
    /// The connection to the endpoint could not be established.
    ConnectionError(String),
    /// The response body could not be received.
    ResponseError(String),
    /// The request itself could not be executed.
    RequestError(String),
    /// The non-2xx HTTP status code returned from the endpoint, along with
    /// the `Retry-After` seconds if the server sent them.
    HttpStatusCode { code: u16, retry_after: Option<u64> },
}

/// The blocking Rest client.
///
#[derive(Debug)]
pub struct RestClient(Client);
impl RestClient {
    /// Create the Rest client with the request timeout applied.
    ///
    pub fn new() -> crate::Result<Self> {
        match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => Ok(Self(client)),
            Err(error) => Err(crate::Error::permanent(format!("Error creating history client ({})", error))),
        }
    }
    /// Start building a GET request for the endpoint URL.
    ///
    pub fn get(&self, url: Url) -> RequestBuilder {
        self.0.get(url)
    }
    /// Execute a Rest request and classify the outcome.
    ///
    /// # Arguments
    ///
    /// - `request` is what will be sent to the Rest client endpoint.
    ///
    pub fn execute(&self, request: Request) -> RestClientResult {
        match self.0.execute(request) {
            Err(err) if err.is_timeout() => RestClientResult::Timeout(err.to_string()),
            Err(err) if err.is_connect() => RestClientResult::ConnectionError(err.to_string()),
            Err(err) => RestClientResult::RequestError(err.to_string()),
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.bytes() {
                        Ok(bytes) => RestClientResult::Body(bytes.into()),
                        Err(err) => RestClientResult::ResponseError(err.to_string()),
                    }
                } else {
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|value| value.to_str().ok())
                        .and_then(|value| value.parse::<u64>().ok());
                    RestClientResult::HttpStatusCode { code: status.as_u16(), retry_after }
                }
            }
        }
    }
}
