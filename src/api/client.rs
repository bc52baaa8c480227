//! HTTP client for the FinPasser payment gateway.
//!
//! Submits pain.001 XML files as multipart uploads. The gateway routes
//! messages by the 7-digit contract id at the start of the file name, so
//! that rule is enforced here before any bytes leave the machine.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::api::error::{body_snippet, ApiError};
use crate::config::schema::ApiConfig;

/// Length of a contract id prefix in a file name.
pub const CONTRACT_ID_LEN: usize = 7;

/// Extract the contract id from a file's base name.
///
/// The gateway expects file names shaped like `1234567_payment.xml`;
/// returns `None` when the first 7 characters are not all ASCII digits.
pub fn contract_id(file_name: &str) -> Option<&str> {
    let prefix = file_name.get(..CONTRACT_ID_LEN)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}

/// Pretty-print a gateway receipt for display.
///
/// Valid JSON is re-indented with 2 spaces; anything else comes back
/// verbatim.
pub fn format_receipt(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Client for the gateway's upload endpoint.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    upload_path: String,
}

impl GatewayClient {
    /// Creates a client for the configured gateway.
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            upload_path: config.upload_path.clone(),
        }
    }

    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, self.upload_path)
    }

    /// Upload a pain.001 XML file, returning the formatted receipt.
    ///
    /// The base name must start with a 7-digit contract id; violations are
    /// refused before any network traffic. A bearer `token` is attached when
    /// one is supplied.
    pub async fn upload(&self, path: &Path, token: Option<&str>) -> Result<String, ApiError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_default();

        if contract_id(&file_name).is_none() {
            return Err(ApiError::InvalidFilename { name: file_name });
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!(file = %file_name, bytes = bytes.len(), "uploading payment file");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/xml")?;
        let form = Form::new().part("file", part);

        let mut request = self.http.post(self.upload_url()).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(format_receipt(&body))
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
                body: body_snippet(&body),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- contract_id --------------------------------------------------------

    #[test]
    fn accepts_seven_digit_prefix() {
        assert_eq!(contract_id("1234567_payment.xml"), Some("1234567"));
        assert_eq!(contract_id("0000001.xml"), Some("0000001"));
    }

    #[test]
    fn rejects_short_or_nondigit_prefixes() {
        assert_eq!(contract_id("123456_payment.xml"), None);
        assert_eq!(contract_id("payment.xml"), None);
        assert_eq!(contract_id("12a4567.xml"), None);
        assert_eq!(contract_id(""), None);
    }

    #[test]
    fn rejects_multibyte_prefix() {
        // get() returns None when the boundary splits a char
        assert_eq!(contract_id("1234é67.xml"), None);
    }

    #[test]
    fn digits_beyond_seven_are_fine() {
        assert_eq!(contract_id("12345678.xml"), Some("1234567"));
    }

    // -- format_receipt -----------------------------------------------------

    #[test]
    fn receipt_json_is_pretty_printed() {
        let formatted = format_receipt(r#"{"status":"SENT_TO_ROUTER","contractId":"1234567"}"#);
        assert!(formatted.contains("\n"), "expected multi-line output");
        assert!(formatted.contains("  \"status\": \"SENT_TO_ROUTER\""));
        assert!(formatted.contains("  \"contractId\": \"1234567\""));
    }

    #[test]
    fn receipt_non_json_passes_through() {
        assert_eq!(format_receipt("OK"), "OK");
        assert_eq!(format_receipt(""), "");
    }

    // -- GatewayClient ------------------------------------------------------

    #[test]
    fn upload_url_joins_base_and_path() {
        let client = GatewayClient::new(&ApiConfig::default());
        assert_eq!(client.upload_url(), "http://localhost:8081/api/upload");
    }

    #[test]
    fn upload_url_tolerates_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://gateway.example.com/".to_string(),
            upload_path: "/api/upload".to_string(),
        };
        let client = GatewayClient::new(&config);
        assert_eq!(client.upload_url(), "https://gateway.example.com/api/upload");
    }

    #[tokio::test]
    async fn upload_refuses_bad_filename_before_network() {
        // base_url points nowhere; the filename check must fire first
        let config = ApiConfig {
            base_url: "http://192.0.2.1:1".to_string(),
            upload_path: "/api/upload".to_string(),
        };
        let client = GatewayClient::new(&config);
        let err = client
            .upload(Path::new("/tmp/not-a-contract.xml"), None)
            .await
            .expect_err("should refuse");
        assert!(matches!(err, ApiError::InvalidFilename { .. }));
    }

    #[tokio::test]
    async fn upload_missing_file_returns_io_error() {
        let config = ApiConfig {
            base_url: "http://192.0.2.1:1".to_string(),
            upload_path: "/api/upload".to_string(),
        };
        let client = GatewayClient::new(&config);
        let err = client
            .upload(Path::new("/tmp/1234567_missing_fpc_test.xml"), None)
            .await
            .expect_err("should fail");
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
