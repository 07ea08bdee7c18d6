use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Starts the task that draws one transfer's samples onto its bar.
pub type Renderer =
    Arc<dyn Fn(ProgressBar, watch::Receiver<ProgressSample>) -> JoinHandle<()> + Send + Sync>;

/// Bytes received so far in one transfer. Only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSample {
    pub downloaded: u64,
    pub total: Option<u64>,
}

impl ProgressSample {
    pub fn start(total: Option<u64>) -> Self {
        Self {
            downloaded: 0,
            total,
        }
    }

    pub fn advance(self, bytes: u64) -> Self {
        Self {
            downloaded: self.downloaded.saturating_add(bytes),
            total: self.total,
        }
    }
}

/// Terminal bar for one download; hidden when `visible` is false.
pub fn progress_bar(url: &str, total: Option<u64>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let (bar, template) = match total {
        Some(len) => (
            ProgressBar::new(len),
            "{msg}\n[{bar:40.cyan/blue}] {bytes}/{total_bytes} {percent}%",
        ),
        None => (ProgressBar::new_spinner(), "{msg}\n{spinner} {bytes}"),
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(format!("downloading {url}"));
    bar
}

/// Render samples as they arrive.
///
/// The watch channel keeps only the latest sample, so the sender never
/// waits on the terminal. The task ends once the sender is dropped.
pub fn spawn_renderer(
    bar: ProgressBar,
    mut samples: watch::Receiver<ProgressSample>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while samples.changed().await.is_ok() {
            let sample = *samples.borrow_and_update();
            bar.set_position(sample.downloaded);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let mut sample = ProgressSample::start(Some(10));
        let mut last = 0;
        for step in [3, 0, 4, 3] {
            sample = sample.advance(step);
            assert!(sample.downloaded >= last);
            last = sample.downloaded;
        }
        assert_eq!(sample.downloaded, 10);
        assert_eq!(sample.total, Some(10));
    }

    #[tokio::test]
    async fn renderer_follows_latest_sample_and_stops_with_sender() {
        let bar = ProgressBar::hidden();
        let (tx, rx) = watch::channel(ProgressSample::start(Some(30)));
        let renderer = spawn_renderer(bar.clone(), rx);

        let mut sample = ProgressSample::start(Some(30));
        for _ in 0..3 {
            sample = sample.advance(10);
            tx.send_replace(sample);
            tokio::task::yield_now().await;
        }
        drop(tx);

        renderer.await.unwrap();
        assert_eq!(bar.position(), 30);
    }
}
