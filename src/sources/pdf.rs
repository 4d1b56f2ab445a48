//! PDF download into a scoped temporary file.

use futures_util::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use super::PaperError;
use crate::config::{ExtractionConfig, HttpConfig};
use crate::utils::{HttpClient, TempPdf};

/// Streams a PDF to disk.
///
/// The body is written chunk by chunk; it is never buffered whole in memory.
#[derive(Debug, Clone)]
pub struct PdfFetcher {
    client: HttpClient,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl PdfFetcher {
    pub fn new(client: HttpClient, http: &HttpConfig, extraction: &ExtractionConfig) -> Self {
        Self {
            client,
            temp_dir: extraction.temp_dir(),
            timeout: http.pdf_timeout(),
        }
    }

    /// Download `pdf_url` into a fresh temporary file.
    ///
    /// The returned guard owns the file and deletes it when dropped, so a
    /// failed download never leaves a partial file behind.
    pub async fn download(&self, pdf_url: &str) -> Result<TempPdf, PaperError> {
        tracing::info!("Downloading PDF: {}", pdf_url);

        let response = self
            .client
            .get(pdf_url, self.timeout)
            .send()
            .await
            .map_err(|e| self.download_error(pdf_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaperError::Download(format!(
                "{} returned status {}",
                pdf_url, status
            )));
        }

        let (artifact, file) = TempPdf::create_in(&self.temp_dir).map_err(|e| {
            PaperError::Download(format!(
                "cannot create temporary file in {}: {}",
                self.temp_dir.display(),
                e
            ))
        })?;
        let mut file = tokio::fs::File::from_std(file);

        let mut written = 0usize;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.download_error(pdf_url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| write_error(&artifact, e))?;
            written += chunk.len();
        }
        file.flush().await.map_err(|e| write_error(&artifact, e))?;

        tracing::debug!(
            "Downloaded {} bytes to {}",
            written,
            artifact.path().display()
        );
        Ok(artifact)
    }

    fn download_error(&self, url: &str, err: reqwest::Error) -> PaperError {
        if err.is_timeout() {
            PaperError::Download(format!(
                "{} timed out after {}s",
                url,
                self.timeout.as_secs()
            ))
        } else {
            PaperError::Download(format!("{}: {}", url, err))
        }
    }
}

fn write_error(artifact: &TempPdf, err: std::io::Error) -> PaperError {
    PaperError::Download(format!(
        "failed writing {}: {}",
        artifact.path().display(),
        err
    ))
}
