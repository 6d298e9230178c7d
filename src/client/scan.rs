//! Receipt scanning.

use reqwest::{
    Method,
    multipart::{Form, Part},
};

use crate::{
    Error,
    client::{ApiClient, check_status},
    receipt::{ReceiptFile, ScanResult},
};

impl ApiClient {
    /// Upload a receipt and return the fields the scan service read from it.
    ///
    /// The file is sent as the multipart field `file`; reqwest sets the
    /// multipart content type and boundary.
    pub async fn scan_receipt(&self, receipt: &ReceiptFile) -> Result<ScanResult, Error> {
        let part = Part::bytes(receipt.bytes.clone())
            .file_name(receipt.file_name.clone())
            .mime_str(receipt.mime_type)?;
        let form = Form::new().part("file", part);

        tracing::debug!(
            "Uploading {} ({} bytes) for scanning",
            receipt.file_name,
            receipt.bytes.len()
        );

        let response = self
            .bearer_request(Method::POST, "/scan/receipt")?
            .multipart(form)
            .send()
            .await?;
        let response = check_status(response, None).await?;

        Ok(response.json().await?)
    }
}
