// SPDX-License-Identifier: MPL-2.0
//! Study sources: where the image sequence comes from and how it is read.

pub mod client;
pub mod sequence;

pub use client::StudyClient;
pub use sequence::{ImageRef, ImageSequence, StudyInfo, StudySource};
