// 该文件是 Xingbian （形变） 项目的一部分。
// src/shape/ellipse.rs - 椭圆拟合与椭圆多边形
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
use nalgebra::{Matrix5, Vector5};

const MIN_FIT_POINTS: usize = 5;

/// 旋转椭圆：`size.0` 为沿 `angle` 方向的全长，`size.1` 为垂直方向的全长
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedEllipse {
  pub center: Point<f64>,
  pub size: (f64, f64),
  /// 角度（度）
  pub angle: f64,
}

/// 最小二乘椭圆拟合，点数不足或二次曲线不是椭圆时返回 `None`
///
/// 以质心为原点拟合 `A u² + B uv + C v² + D u + E v = 1`，
/// 再由二次型的主轴求出中心、半轴与转角。
pub fn fit_ellipse(points: &[Point<i32>]) -> Option<RotatedEllipse> {
  if points.len() < MIN_FIT_POINTS {
    return None;
  }

  let n = points.len() as f64;
  let mean_x = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
  let mean_y = points.iter().map(|p| p.y as f64).sum::<f64>() / n;

  let mut normal = Matrix5::<f64>::zeros();
  let mut rhs = Vector5::<f64>::zeros();
  for p in points {
    let u = p.x as f64 - mean_x;
    let v = p.y as f64 - mean_y;
    let row = Vector5::new(u * u, u * v, v * v, u, v);
    normal += row * row.transpose();
    rhs += row;
  }

  let conic = normal.lu().solve(&rhs)?;
  let (a, b, c, d, e) = (conic[0], conic[1], conic[2], conic[3], conic[4]);

  let det = 4.0 * a * c - b * b;
  if !(det > 0.0) {
    return None;
  }
  let u0 = (b * e - 2.0 * c * d) / det;
  let v0 = (b * d - 2.0 * a * e) / det;
  // 平移到中心后 A x² + B xy + C y² = k
  let k = 1.0 - (d * u0 + e * v0) * 0.5;

  let theta = 0.5 * b.atan2(a - c);
  let (sin_t, cos_t) = theta.sin_cos();
  let along = a * cos_t * cos_t + b * sin_t * cos_t + c * sin_t * sin_t;
  let across = a * sin_t * sin_t - b * sin_t * cos_t + c * cos_t * cos_t;

  let half_along = k / along;
  let half_across = k / across;
  if !(half_along > 0.0 && half_across > 0.0) {
    return None;
  }

  Some(RotatedEllipse {
    center: Point::new(mean_x + u0, mean_y + v0),
    size: (2.0 * half_along.sqrt(), 2.0 * half_across.sqrt()),
    angle: theta.to_degrees(),
  })
}

/// 生成椭圆弧的整数多边形，相邻重复点被去掉
pub fn ellipse_to_poly(
  center: Point<i32>,
  axes: (i32, i32),
  angle: i32,
  arc_start: i32,
  arc_end: i32,
  delta: i32,
) -> Vec<Point<i32>> {
  let mut angle = angle;
  while angle < 0 {
    angle += 360;
  }
  while angle > 360 {
    angle -= 360;
  }

  let (mut arc_start, mut arc_end) = if arc_start > arc_end {
    (arc_end, arc_start)
  } else {
    (arc_start, arc_end)
  };
  while arc_start < 0 {
    arc_start += 360;
    arc_end += 360;
  }
  while arc_end > 360 {
    arc_end -= 360;
    arc_start -= 360;
  }
  if arc_end - arc_start > 360 {
    arc_start = 0;
    arc_end = 360;
  }
  let delta = delta.clamp(1, 180);

  let (beta, alpha) = (angle as f64).to_radians().sin_cos();
  let (size_a, size_b) = (axes.0 as f64, axes.1 as f64);

  let mut polygon: Vec<Point<i32>> = Vec::new();
  let mut i = arc_start;
  while i < arc_end + delta {
    let mut degree = i.min(arc_end);
    if degree < 0 {
      degree += 360;
    }
    let (sin_d, cos_d) = (degree as f64).to_radians().sin_cos();
    let x = size_a * cos_d;
    let y = size_b * sin_d;
    let point = Point::new(
      (center.x as f64 + x * alpha - y * beta).round() as i32,
      (center.y as f64 + x * beta + y * alpha).round() as i32,
    );
    if polygon.last() != Some(&point) {
      polygon.push(point);
    }
    i += delta;
  }

  if polygon.len() == 1 {
    polygon.push(polygon[0]);
  }
  polygon
}
