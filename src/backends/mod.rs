// SPDX-License-Identifier: GPL-3.0-only

//! Frame acquisition
//!
//! A frame source hands out registered color/depth pairs together with the
//! color camera intrinsics. The viewer loop pulls one frame per tick and
//! does not care whether it came from a still image, a replayed capture
//! directory, or a live device.
//!
//! # Modules
//!
//! - [`types`]: frame, image, and intrinsics types
//! - [`file_source`]: sources backed by PNG files on disk

pub mod file_source;
pub mod types;

pub use file_source::{SequenceFrameSource, StillFrameSource};
pub use types::{ColorImage, DepthImage, Intrinsics, RgbdFrame};

use crate::errors::FrameError;

/// Producer of RGB-D frames
pub trait FrameSource {
    /// Fetch the next registered frame
    fn next_frame(&mut self) -> Result<RgbdFrame, FrameError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn next_frame(&mut self) -> Result<RgbdFrame, FrameError> {
        (**self).next_frame()
    }
}
