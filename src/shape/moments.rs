// 该文件是 Xingbian （形变） 项目的一部分。
// src/shape/moments.rs - 轮廓矩与 Hu 不变矩
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

use imageproc::point::Point;

const MATCH_EPSILON: f64 = 1.0e-5;

/// 多边形围成区域的空间矩（到三阶）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
  pub m00: f64,
  pub m10: f64,
  pub m01: f64,
  pub m20: f64,
  pub m11: f64,
  pub m02: f64,
  pub m30: f64,
  pub m21: f64,
  pub m12: f64,
  pub m03: f64,
}

impl Moments {
  /// 以格林公式沿多边形边界累加，面积为零时返回全零
  pub fn of_contour(points: &[Point<i32>]) -> Self {
    let Some(&last) = points.last() else {
      return Self::default();
    };

    let mut a = [0.0f64; 10];
    let (mut xp, mut yp) = (last.x as f64, last.y as f64);
    for p in points {
      let (xi, yi) = (p.x as f64, p.y as f64);
      let (xi2, yi2) = (xi * xi, yi * yi);
      let (xp2, yp2) = (xp * xp, yp * yp);
      let dxy = xp * yi - xi * yp;
      let sx = xp + xi;
      let sy = yp + yi;

      a[0] += dxy;
      a[1] += dxy * sx;
      a[2] += dxy * sy;
      a[3] += dxy * (xp * sx + xi2);
      a[4] += dxy * (xp * (sy + yp) + xi * (sy + yi));
      a[5] += dxy * (yp * sy + yi2);
      a[6] += dxy * sx * (xp2 + xi2);
      a[7] += dxy * (xp2 * (3.0 * yp + yi) + 2.0 * xi * xp * sy + xi2 * (yp + 3.0 * yi));
      a[8] += dxy * (yp2 * (3.0 * xp + xi) + 2.0 * yi * yp * sx + yi2 * (xp + 3.0 * xi));
      a[9] += dxy * sy * (yp2 + yi2);

      (xp, yp) = (xi, yi);
    }

    if a[0].abs() <= f32::EPSILON as f64 {
      return Self::default();
    }
    // 顺时针轮廓面积为负
    let sign = a[0].signum();
    Self {
      m00: a[0] * sign / 2.0,
      m10: a[1] * sign / 6.0,
      m01: a[2] * sign / 6.0,
      m20: a[3] * sign / 12.0,
      m11: a[4] * sign / 24.0,
      m02: a[5] * sign / 12.0,
      m30: a[6] * sign / 20.0,
      m21: a[7] * sign / 60.0,
      m12: a[8] * sign / 60.0,
      m03: a[9] * sign / 20.0,
    }
  }

  /// 七个 Hu 不变矩
  pub fn hu(&self) -> [f64; 7] {
    if self.m00 == 0.0 {
      return [0.0; 7];
    }
    let cx = self.m10 / self.m00;
    let cy = self.m01 / self.m00;

    let mu20 = self.m20 - self.m10 * cx;
    let mu11 = self.m11 - self.m10 * cy;
    let mu02 = self.m02 - self.m01 * cy;
    let mu30 = self.m30 - cx * (3.0 * mu20 + cx * self.m10);
    let mu21 = self.m21 - cx * (2.0 * mu11 + cx * self.m01) - cy * mu20;
    let mu12 = self.m12 - cy * (2.0 * mu11 + cy * self.m10) - cx * mu02;
    let mu03 = self.m03 - cy * (3.0 * mu02 + cy * self.m01);

    let inv = 1.0 / self.m00;
    let s2 = inv * inv;
    let s3 = s2 * inv.abs().sqrt();
    let (n20, n11, n02) = (mu20 * s2, mu11 * s2, mu02 * s2);
    let (n30, n21, n12, n03) = (mu30 * s3, mu21 * s3, mu12 * s3, mu03 * s3);

    let mut hu = [0.0; 7];
    let mut t0 = n30 + n12;
    let mut t1 = n21 + n03;
    let mut q0 = t0 * t0;
    let mut q1 = t1 * t1;
    let n4 = 4.0 * n11;
    let sum = n20 + n02;
    let diff = n20 - n02;

    hu[0] = sum;
    hu[1] = diff * diff + n4 * n11;
    hu[3] = q0 + q1;
    hu[5] = diff * (q0 - q1) + n4 * t0 * t1;

    t0 *= q0 - 3.0 * q1;
    t1 *= 3.0 * q0 - q1;
    q0 = n30 - 3.0 * n12;
    q1 = 3.0 * n21 - n03;

    hu[2] = q0 * q0 + q1 * q1;
    hu[4] = q0 * t0 + q1 * t1;
    hu[6] = q1 * t0 - q0 * t1;
    hu
  }
}

/// 轮廓的 Hu 不变矩
pub fn hu_moments(points: &[Point<i32>]) -> [f64; 7] {
  Moments::of_contour(points).hu()
}

/// 基于 Hu 矩对数的形状距离（取各分量相对差的最大值），越小越相似
///
/// 只有一侧的 Hu 矩全为零时返回 `f64::MAX`。
pub fn match_shapes_i3(a: &[Point<i32>], b: &[Point<i32>]) -> f64 {
  let hu_a = hu_moments(a);
  let hu_b = hu_moments(b);

  let mut any_a = false;
  let mut any_b = false;
  let mut result = 0.0f64;
  for (&ha, &hb) in hu_a.iter().zip(hu_b.iter()) {
    let (abs_a, abs_b) = (ha.abs(), hb.abs());
    any_a |= abs_a > 0.0;
    any_b |= abs_b > 0.0;

    if abs_a > MATCH_EPSILON && abs_b > MATCH_EPSILON {
      let log_a = ha.signum() * abs_a.log10();
      let log_b = hb.signum() * abs_b.log10();
      result = result.max(((log_a - log_b) / log_a).abs());
    }
  }

  if any_a != any_b { f64::MAX } else { result }
}
