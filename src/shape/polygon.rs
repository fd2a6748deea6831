// 该文件是 Xingbian （形变） 项目的一部分。
// src/shape/polygon.rs - 闭合轮廓的多边形逼近
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

use imageproc::{point::Point, rect::Rect};

// 寻找初始分割点时交替求最远点的次数
const INIT_ITERS: usize = 3;

fn dist2(a: Point<i32>, b: Point<i32>) -> f64 {
  let dx = (b.x - a.x) as f64;
  let dy = (b.y - a.y) as f64;
  dx * dx + dy * dy
}

/// 闭合曲线的 Douglas-Peucker 逼近
///
/// 先交替求最远点得到两个相距较远的分割点，把闭合曲线切成两段分别逼近，
/// 最后去掉几乎落在相邻顶点连线上的多余顶点。结果不重复首点。
pub fn approx_polygon_dp(curve: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
  if curve.len() < 3 {
    return curve.to_vec();
  }
  let eps2 = epsilon * epsilon;

  let mut start = 0;
  let (mut far, mut far_dist2) = farthest_from(curve, start);
  for _ in 1..INIT_ITERS {
    start = far;
    (far, far_dist2) = farthest_from(curve, start);
  }

  if far_dist2 <= eps2 {
    return vec![curve[start]];
  }

  let mut polygon = Vec::new();
  simplify_arc(curve, start, far, eps2, &mut polygon);
  simplify_arc(curve, far, start, eps2, &mut polygon);
  drop_straight_vertices(polygon, eps2)
}

fn farthest_from(curve: &[Point<i32>], start: usize) -> (usize, f64) {
  let n = curve.len();
  let origin = curve[start];
  let mut best = (start, 0.0);
  for offset in 1..n {
    let index = (start + offset) % n;
    let d = dist2(origin, curve[index]);
    if d > best.1 {
      best = (index, d);
    }
  }
  best
}

/// 逼近从 `from` 沿曲线方向到 `to` 的一段弧，输出不含终点
fn simplify_arc(
  curve: &[Point<i32>],
  from: usize,
  to: usize,
  eps2: f64,
  polygon: &mut Vec<Point<i32>>,
) {
  let n = curve.len();
  let mut pending = vec![(from, to)];

  while let Some((a, b)) = pending.pop() {
    let span = (b + n - a) % n;
    let pa = curve[a];
    let pb = curve[b];
    let dx = (pb.x - pa.x) as f64;
    let dy = (pb.y - pa.y) as f64;
    let chord2 = dx * dx + dy * dy;

    let mut split: Option<(usize, f64)> = None;
    for offset in 1..span {
      let index = (a + offset) % n;
      let p = curve[index];
      let deviation = if chord2 > 0.0 {
        let cross = (p.x - pa.x) as f64 * dy - (p.y - pa.y) as f64 * dx;
        cross * cross / chord2
      } else {
        dist2(pa, p)
      };
      if split.is_none_or(|(_, max)| deviation > max) {
        split = Some((index, deviation));
      }
    }

    match split {
      Some((index, deviation)) if deviation > eps2 => {
        pending.push((index, b));
        pending.push((a, index));
      }
      _ => polygon.push(pa),
    }
  }
}

fn drop_straight_vertices(polygon: Vec<Point<i32>>, eps2: f64) -> Vec<Point<i32>> {
  let n = polygon.len();
  if n <= 2 {
    return polygon;
  }

  let mut kept = Vec::with_capacity(n);
  let mut remaining = n;
  let mut prev = polygon[n - 1];
  let mut i = 0;
  while i < n {
    let current = polygon[i];
    let next = if i + 1 < n {
      polygon[i + 1]
    } else {
      kept.first().copied().unwrap_or(polygon[0])
    };

    if remaining > 2 && lies_on_chord(prev, current, next, eps2) {
      remaining -= 1;
      if i + 1 < n {
        kept.push(next);
        prev = next;
      }
      i += 2;
      continue;
    }

    kept.push(current);
    prev = current;
    i += 1;
  }
  kept
}

fn lies_on_chord(start: Point<i32>, point: Point<i32>, end: Point<i32>, eps2: f64) -> bool {
  let dx = (end.x - start.x) as f64;
  let dy = (end.y - start.y) as f64;
  let px = (point.x - start.x) as f64;
  let py = (point.y - start.y) as f64;
  let cross = (px * dy - py * dx).abs();
  let along = px * (end.x - point.x) as f64 + py * (end.y - point.y) as f64;

  dx != 0.0 && dy != 0.0 && along >= 0.0 && cross * cross <= 0.5 * eps2 * (dx * dx + dy * dy)
}

/// 包含全部点的轴对齐矩形（端点包含在内）
pub fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
  let first = points.first()?;
  let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
  for p in points.iter().skip(1) {
    min_x = min_x.min(p.x);
    min_y = min_y.min(p.y);
    max_x = max_x.max(p.x);
    max_y = max_y.max(p.y);
  }
  let width = (max_x - min_x + 1) as u32;
  let height = (max_y - min_y + 1) as u32;
  Some(Rect::at(min_x, min_y).of_size(width, height))
}
