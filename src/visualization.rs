// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization and view composites
//!
//! Provides functions for turning frames into viewable images:
//! - Inferno colormap of raw depth (dark=near, bright=far)
//! - Side-by-side composite of two images
//! - 50/50 blended overlay of two images

use crate::backends::types::DepthImage;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Inferno colormap: perceptually uniform black-purple-orange-yellow
///
/// Polynomial fit of the matplotlib table, accurate to within a couple of
/// 8-bit steps.
#[inline]
fn inferno(t: f32) -> [u8; 3] {
    const C: [[f32; 3]; 7] = [
        [0.000_218_94, 0.001_651_00, -0.019_480_90],
        [0.106_513_42, 0.563_956_44, 3.932_712_4],
        [11.602_493, -3.972_854, -15.942_394],
        [-41.703_996, 17.436_399, 44.354_145],
        [77.162_94, -33.402_36, -81.807_31],
        [-71.319_43, 32.626_064, 73.209_52],
        [25.131_126, -12.242_669, -23.070_325],
    ];

    let mut rgb = [0u8; 3];
    for (channel, out) in rgb.iter_mut().enumerate() {
        let value = C
            .iter()
            .rev()
            .fold(0.0f32, |acc, coeffs| acc * t + coeffs[channel]);
        *out = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    rgb
}

/// Scale raw depth by `alpha`, saturate to 8 bits, and apply inferno
///
/// With the default `alpha` of 0.03 the colormap saturates at about
/// 8.5 m for millimeter depth.
pub fn depth_colormap(depth: &DepthImage, alpha: f32) -> RgbImage {
    // 256-entry table, one per saturated level
    let lut: Vec<[u8; 3]> = (0..=255u16).map(|i| inferno(i as f32 / 255.0)).collect();

    RgbImage::from_fn(depth.width(), depth.height(), |u, v| {
        let raw = depth.get_pixel(u, v).0[0] as f32;
        let level = (raw * alpha).abs().round().min(255.0) as usize;
        Rgb(lut[level])
    })
}

/// Place `right` next to `left`
///
/// `right` is rescaled to `left`'s height (keeping its aspect ratio) when
/// the heights differ.
pub fn side_by_side(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let right = match_height(right, left.height());
    let mut out = RgbImage::new(left.width() + right.width(), left.height());
    imageops::replace(&mut out, left, 0, 0);
    imageops::replace(&mut out, &*right, i64::from(left.width()), 0);
    out
}

/// Blend two images 50/50, rounding half up
///
/// `top` is rescaled to `base`'s size when they differ.
pub fn overlay(base: &RgbImage, top: &RgbImage) -> RgbImage {
    let top = if top.dimensions() == base.dimensions() {
        std::borrow::Cow::Borrowed(top)
    } else {
        std::borrow::Cow::Owned(imageops::resize(
            top,
            base.width(),
            base.height(),
            FilterType::Triangle,
        ))
    };

    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(top.pixels()) {
        for (a, b) in dst.0.iter_mut().zip(src.0) {
            *a = ((u16::from(*a) + u16::from(b) + 1) / 2) as u8;
        }
    }
    out
}

fn match_height(image: &RgbImage, height: u32) -> std::borrow::Cow<'_, RgbImage> {
    if image.height() == height || image.height() == 0 {
        return std::borrow::Cow::Borrowed(image);
    }
    let width = ((image.width() as u64 * height as u64) / image.height() as u64).max(1) as u32;
    std::borrow::Cow::Owned(imageops::resize(image, width, height, FilterType::Triangle))
}
