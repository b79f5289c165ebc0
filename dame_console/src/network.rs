// Blocking HTTP transport for `DameRequest`s. Runs on a dedicated thread, so blocking is fine.

use std::fmt;

use dame_client::protocol::{DameRequest, HttpMethod};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use url::Url;


#[derive(Debug)]
pub enum CommunicationError {
    Url(url::ParseError),
    Http(reqwest::Error),
    Status(StatusCode),
}

impl fmt::Display for CommunicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunicationError::Url(err) => write!(f, "Invalid URL: {}", err),
            CommunicationError::Http(err) => write!(f, "HTTP error: {}", err),
            CommunicationError::Status(status) => write!(f, "Server returned {}", status),
        }
    }
}

impl std::error::Error for CommunicationError {}

// Accepts "host:port" as well as a full URL.
pub fn server_url(address: &str) -> Result<Url, CommunicationError> {
    let address = address.trim();
    let full_address = if address.contains("://") {
        address.to_owned()
    } else {
        format!("http://{}", address)
    };
    Url::parse(&full_address).map_err(CommunicationError::Url)
}

pub fn request_url(server: &Url, request: &DameRequest) -> Result<Url, CommunicationError> {
    server.join(&request.path()).map_err(CommunicationError::Url)
}


pub struct RestConnection {
    client: Client,
    server: Url,
}

impl RestConnection {
    pub fn new(server: Url) -> Self { RestConnection { client: Client::new(), server } }

    pub fn server(&self) -> &Url { &self.server }

    // Returns the response body. Non-2xx statuses are errors.
    pub fn execute(&self, request: &DameRequest) -> Result<String, CommunicationError> {
        let url = request_url(&self.server, request)?;
        let builder = match request.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        let response = builder.send().map_err(CommunicationError::Http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CommunicationError::Status(status));
        }
        response.text().map_err(CommunicationError::Http)
    }
}


#[cfg(test)]
mod tests {
    use dame_client::coord::Coord;
    use dame_client::session::SessionId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scheme_is_optional() {
        assert_eq!(server_url("localhost:8000").unwrap().as_str(), "http://localhost:8000/");
        assert_eq!(server_url("https://dame.example").unwrap().as_str(), "https://dame.example/");
        assert!(server_url("http://").is_err());
    }

    #[test]
    fn request_path_is_absolute() {
        let server = server_url("http://localhost:8000/play/").unwrap();
        let request = DameRequest::Select {
            session_id: SessionId::new("g1".to_owned()),
            from: Coord::new(2, 2).unwrap(),
        };
        assert_eq!(
            request_url(&server, &request).unwrap().as_str(),
            "http://localhost:8000/rest/select/g1/2/2"
        );
    }
}
