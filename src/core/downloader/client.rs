use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::archive::Extractor;
use crate::core::error::{BuildError, BuildResult};
use crate::core::report::Reporter;

use super::artifact::ArtifactDescriptor;
use super::progress::{self, ProgressSample, Renderer};

/// Streams artifacts to disk and unpacks them. One transfer at a time.
pub struct Downloader {
    client: Client,
    extractor: Extractor,
    /// Render a terminal progress bar while transferring.
    show_progress: bool,
    renderer: Renderer,
}

impl Downloader {
    pub fn new(client: Client, extractor: Extractor) -> Self {
        Self {
            client,
            extractor,
            show_progress: true,
            renderer: Arc::new(progress::spawn_renderer),
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Replace the task that draws progress samples.
    pub fn with_renderer(
        mut self,
        renderer: impl Fn(ProgressBar, watch::Receiver<ProgressSample>) -> JoinHandle<()>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    // ── Single file download ────────────────────────────

    /// Stream `url` into `dest`, optionally validating SHA-256.
    ///
    /// Progress goes to a separate renderer task through a watch channel;
    /// this returns only once every byte is written and flushed.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha256_expected: Option<&str>,
    ) -> BuildResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BuildError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();
        let bar = progress::progress_bar(url, total_bytes, self.show_progress);
        let (progress_tx, progress_rx) = watch::channel(ProgressSample::start(total_bytes));
        let renderer = (self.renderer)(bar.clone(), progress_rx);

        let mut hasher = sha256_expected.map(|_| Sha256::new());
        let mut sample = ProgressSample::start(total_bytes);

        // Write inside a block so the handle is closed before extraction starts
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| BuildError::io(dest, e))?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| BuildError::io(dest, e))?;
                if let Some(hasher) = hasher.as_mut() {
                    hasher.update(&chunk);
                }
                sample = sample.advance(chunk.len() as u64);
                progress_tx.send_replace(sample);
            }

            file.flush().await.map_err(|e| BuildError::io(dest, e))?;
        }

        drop(progress_tx);
        if let Err(e) = renderer.await {
            warn!("Progress renderer for {} stopped abnormally: {}", url, e);
        }
        // the stream may end before the last sample is drawn
        bar.set_position(sample.downloaded);
        bar.finish_and_clear();

        if let (Some(expected), Some(hasher)) = (sha256_expected, hasher) {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(BuildError::ChecksumMismatch {
                    path: dest.to_path_buf(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        debug!("Downloaded {} bytes: {} -> {:?}", sample.downloaded, url, dest);
        Ok(sample.downloaded)
    }

    // ── Download and unpack ─────────────────────────────

    /// Download the artifact archive, extract it into `<directory>/<name>`,
    /// then delete the archive. Returns the extracted directory.
    pub async fn download_zip(
        &self,
        artifact: &ArtifactDescriptor,
        reporter: &dyn Reporter,
    ) -> BuildResult<PathBuf> {
        let output = artifact.output_dir();
        let zip_output = artifact.archive_path();

        reporter.info(&format!(
            "attempting to download and unzip {} to {}",
            artifact.name,
            output.display()
        ));
        info!("Fetching {}", artifact.url);

        self.download_file(&artifact.url, &zip_output, artifact.sha256.as_deref())
            .await?;

        reporter.info("attempting to decompress downloaded file");
        self.extractor
            .decompress(&zip_output, Some(&output))
            .await?;

        reporter.info("removing downloaded file");
        tokio::fs::remove_file(&zip_output)
            .await
            .map_err(|e| BuildError::io(&zip_output, e))?;

        reporter.success(&format!(
            "{} has successfully been downloaded and decompressed",
            artifact.name
        ));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::builtin::fixtures::zip_bytes;
    use crate::core::archive::BuiltinUnzip;
    use crate::core::report::{Level, MemoryReporter};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloader() -> Downloader {
        Downloader::new(Client::new(), Extractor::Builtin(BuiltinUnzip)).with_progress(false)
    }

    fn artifact(server: &MockServer, dir: &Path, sha256: Option<String>) -> ArtifactDescriptor {
        ArtifactDescriptor {
            url: format!("{}/skia.zip", server.uri()),
            name: "skia-test".to_string(),
            directory: dir.to_path_buf(),
            sha256,
        }
    }

    #[tokio::test]
    async fn extracts_and_removes_archive() {
        let server = MockServer::start().await;
        let body = zip_bytes(&[("out/Release-arm64/libskia.a", "!<arch>")]);
        Mock::given(method("GET"))
            .and(path("/skia.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact(&server, dir.path(), None);
        let reporter = MemoryReporter::default();

        let output = downloader()
            .download_zip(&artifact, &reporter)
            .await
            .unwrap();

        assert_eq!(output, dir.path().join("skia-test"));
        assert!(output
            .join("out")
            .join("Release-arm64")
            .join("libskia.a")
            .is_file());
        assert!(!artifact.archive_path().exists());
        assert_eq!(
            reporter.messages(Level::Success),
            vec!["skia-test has successfully been downloaded and decompressed".to_string()]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_download_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let reporter = MemoryReporter::default();
        let err = downloader()
            .download_zip(&artifact(&server, dir.path(), None), &reporter)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::DownloadFailed { status: 404, .. }
        ));
        assert!(!dir.path().join("skia-test").exists());
    }

    #[tokio::test]
    async fn file_written_in_full_with_matching_checksum() {
        let server = MockServer::start().await;
        let body = vec![7_u8; 256 * 1024];
        let expected = hex::encode(Sha256::digest(&body));
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("blob.bin");
        let written = downloader()
            .download_file(&format!("{}/blob", server.uri()), &dest, Some(&expected))
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn checksum_mismatch_stops_before_extraction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_bytes(&[("a", "b")])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact(&server, dir.path(), Some("00".repeat(32)));
        let reporter = MemoryReporter::default();

        let err = downloader()
            .download_zip(&artifact, &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::ChecksumMismatch { .. }));
        assert!(!artifact.output_dir().exists());
        // partial downloads are left in place
        assert!(artifact.archive_path().exists());
    }

    #[tokio::test]
    async fn stalled_renderer_never_holds_up_the_write() {
        use std::sync::Mutex;
        use std::time::Duration;
        use tokio::sync::oneshot;

        let server = MockServer::start().await;
        let body: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        // The renderer reads nothing until the writer drops the sender, then
        // reports the one sample it finally sees.
        let (seen_tx, seen_rx) = oneshot::channel::<ProgressSample>();
        let seen_tx = Mutex::new(Some(seen_tx));
        let stalled = move |_bar: ProgressBar, samples: watch::Receiver<ProgressSample>| {
            let report = seen_tx.lock().unwrap().take();
            tokio::spawn(async move {
                while samples.has_changed().is_ok() {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                if let Some(report) = report {
                    let _ = report.send(*samples.borrow());
                }
            })
        };

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("blob.bin");
        let written = tokio::time::timeout(
            Duration::from_secs(30),
            downloader()
                .with_renderer(stalled)
                .download_file(&format!("{}/blob", server.uri()), &dest, None),
        )
        .await
        .expect("write finished while the renderer was stalled")
        .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);

        let last = seen_rx.await.unwrap();
        // only the latest sample is kept for a slow renderer
        assert_eq!(last.downloaded, body.len() as u64);
    }
}
