// 该文件是 Xingbian （形变） 项目的一部分。
// src/vision/edge.rs - 灰度化、高斯模糊与 Canny 边缘检测
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{GrayImage, Luma, RgbImage};
use imageproc::{edges::canny, filter::gaussian_blur_f32};
use tracing::debug;

use super::VisionError;

pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;
pub const BLUR_KERNEL_SIZE: u32 = 5;

// BT.601 灰度权重
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// 未指定 sigma 时由核大小推导的高斯 sigma
fn sigma_for_kernel(kernel_size: u32) -> f32 {
  0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// RGB 转灰度
pub fn to_gray(image: &RgbImage) -> GrayImage {
  GrayImage::from_fn(image.width(), image.height(), |x, y| {
    let [r, g, b] = image.get_pixel(x, y).0;
    let value = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    Luma([value.round().clamp(0.0, 255.0) as u8])
  })
}

/// 从彩色图像提取二值边缘图
pub fn extract_edges(
  image: &RgbImage,
  low_threshold: f32,
  high_threshold: f32,
) -> Result<GrayImage, VisionError> {
  ensure_not_empty(image.width(), image.height())?;
  extract_edges_gray(&to_gray(image), low_threshold, high_threshold)
}

/// 从灰度图像提取二值边缘图
pub fn extract_edges_gray(
  gray: &GrayImage,
  low_threshold: f32,
  high_threshold: f32,
) -> Result<GrayImage, VisionError> {
  ensure_not_empty(gray.width(), gray.height())?;
  if !(low_threshold.is_finite() && high_threshold.is_finite()) || low_threshold > high_threshold
  {
    return Err(VisionError::InvalidThresholds {
      low: low_threshold,
      high: high_threshold,
    });
  }

  let sigma = sigma_for_kernel(BLUR_KERNEL_SIZE);
  let blurred = gaussian_blur_f32(gray, sigma);
  let edges = canny(&blurred, low_threshold, high_threshold);

  debug!(
    "边缘提取完成: {}x{}, sigma = {:.2}, 阈值 = ({}, {})",
    gray.width(),
    gray.height(),
    sigma,
    low_threshold,
    high_threshold
  );

  Ok(edges)
}

fn ensure_not_empty(width: u32, height: u32) -> Result<(), VisionError> {
  if width == 0 || height == 0 {
    return Err(VisionError::InvalidImage { width, height });
  }
  Ok(())
}
