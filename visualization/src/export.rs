//! Frame export
//!
//! Frames are handed to a [`FrameSink`] one at a time. A frame that fails to
//! export is logged and skipped; the batch always runs to the end. Frames
//! before `skip_until` are not exported at all, which lets an interrupted
//! export resume where it stopped.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, trace};
use thiserror::Error;

use crate::frame::VisualizationFrame;

/// Export error
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Receiver of rendered frames
pub trait FrameSink {
    /// Exports one frame; each frame must be exportable on its own
    fn write_frame(&mut self, frame: &VisualizationFrame) -> Result<(), ExportError>;

    /// Called once after the last frame
    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Writes each frame to `frame_NNNN.json` in a directory
#[derive(Debug, Clone)]
pub struct JsonFrameSink {
    dir: PathBuf,
    pretty: bool,
}

impl JsonFrameSink {
    /// Creates the sink, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, pretty: false })
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, step_index: usize) -> PathBuf {
        self.dir.join(format!("frame_{step_index:04}.json"))
    }
}

impl FrameSink for JsonFrameSink {
    fn write_frame(&mut self, frame: &VisualizationFrame) -> Result<(), ExportError> {
        let path = self.frame_path(frame.step_index);
        let mut writer = BufWriter::new(File::create(&path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, frame)?;
        } else {
            serde_json::to_writer(&mut writer, frame)?;
        }
        writer.flush()?;
        trace!("Saved frame: {}", path.display());
        Ok(())
    }
}

/// Export options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Frames with a lower step index are skipped
    pub skip_until: usize,
}

/// Outcome counts of one export batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Exports `frames` in order, logging and counting per-frame failures
pub fn export_frames<'a, S, I>(sink: &mut S, frames: I, options: ExportOptions) -> ExportSummary
where
    S: FrameSink + ?Sized,
    I: IntoIterator<Item = &'a VisualizationFrame>,
{
    let mut summary = ExportSummary::default();

    for frame in frames {
        if frame.step_index < options.skip_until {
            debug!("Skipping frame {}", frame.step_index);
            summary.skipped += 1;
            continue;
        }

        match sink.write_frame(frame) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                error!("Error saving frame {} ({}), skipping", frame.step_index, e);
                summary.failed += 1;
            }
        }
    }

    if let Err(e) = sink.finish() {
        error!("Frame sink failed to finish: {}", e);
    }

    info!(
        "Exported {} frames ({} skipped, {} failed)",
        summary.written, summary.skipped, summary.failed
    );
    summary
}
