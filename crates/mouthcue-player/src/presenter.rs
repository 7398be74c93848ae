//! Console overlay presenter.

use std::io::Write;

use mouthcue_media::{OverlayFrame, OverlayPresenter};
use mouthcue_models::PixelPosition;
use tracing::warn;

/// Writes one JSON line per overlay change.
///
/// Repeated identical updates are collapsed so a 60 Hz loop does not flood
/// the output.
pub struct ConsolePresenter<W: Write> {
    out: W,
    last: Option<OverlayFrame>,
    written: usize,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            written: 0,
        }
    }

    /// Number of lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &OverlayFrame) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> OverlayPresenter for ConsolePresenter<W> {
    fn present(&mut self, position: Option<PixelPosition>, text: &str) {
        let frame = OverlayFrame::new(position, text);
        if self.last.as_ref() == Some(&frame) {
            return;
        }

        match self.write_frame(&frame) {
            Ok(()) => self.written += 1,
            Err(e) => warn!(error = %e, "Failed to write overlay update"),
        }
        self.last = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_changes_only() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        let at = Some(PixelPosition::new(200.0, 120.0));

        presenter.present(None, "Mock Text...");
        presenter.present(at, "Mock Text...");
        presenter.present(at, "Mock Text...");
        presenter.present(None, "Mock Text...");

        assert_eq!(presenter.written(), 3);
        let output = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<OverlayFrame> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert!(!lines[0].is_visible());
        assert_eq!(lines[1].position, at);
        assert!(!lines[2].is_visible());
    }
}
