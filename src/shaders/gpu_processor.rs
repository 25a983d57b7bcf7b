// SPDX-License-Identifier: GPL-3.0-only

//! Shared GPU readback helpers
//!
//! Texture-to-buffer copies require every row to start on a
//! `COPY_BYTES_PER_ROW_ALIGNMENT` boundary, so readback buffers are laid out
//! with padded rows and trimmed on the CPU side.

use crate::errors::RenderError;
use crate::gpu::wgpu;

/// Row pitch for a texture copy, rounded up to the copy alignment
///
/// # Arguments
/// * `width` - Row width in texels
/// * `bytes_per_pixel` - Texel size (4 for RGBA8)
#[inline]
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let unpadded = width * bytes_per_pixel;
    unpadded.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
}

/// Drop the per-row padding from a readback buffer
///
/// Returns `height * row_bytes` tightly packed bytes.
pub fn strip_row_padding(data: &[u8], row_bytes: usize, padded_row: usize, height: usize) -> Vec<u8> {
    if row_bytes == padded_row {
        return data[..row_bytes * height].to_vec();
    }

    let mut output = Vec::with_capacity(row_bytes * height);
    for row in data.chunks(padded_row).take(height) {
        output.extend_from_slice(&row[..row_bytes]);
    }
    output
}

/// Helper for async buffer readback (map, poll, read, unmap)
///
/// # Arguments
/// * `device` - The wgpu device for polling
/// * `buffer` - The buffer to read from (must be MAP_READ)
///
/// # Returns
/// The buffer contents as a Vec<u8>
pub async fn read_buffer_async(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
) -> Result<Vec<u8>, RenderError> {
    let slice = buffer.slice(..);
    let (sender, receiver) = futures::channel::oneshot::channel();

    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });

    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| RenderError::Readback(format!("device poll failed: {:?}", e)))?;

    receiver
        .await
        .map_err(|_| RenderError::Readback("buffer mapping was cancelled".to_string()))?
        .map_err(|e| RenderError::Readback(format!("failed to map buffer: {:?}", e)))?;

    let data = slice.get_mapped_range().to_vec();
    buffer.unmap();

    Ok(data)
}
