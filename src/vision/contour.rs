// 该文件是 Xingbian （形变） 项目的一部分。
// src/vision/contour.rs - 轮廓提取
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

use image::GrayImage;
use imageproc::{contours::BorderType, point::Point};
use tracing::debug;

/// 闭合轮廓
///
/// `parent` 与 `is_hole` 记录轮廓树的拓扑，分类时不使用。
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
  pub points: Vec<Point<i32>>,
  pub parent: Option<usize>,
  pub is_hole: bool,
}

impl Contour {
  pub fn new(points: Vec<Point<i32>>) -> Self {
    Self {
      points,
      parent: None,
      is_hole: false,
    }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

impl From<Vec<Point<i32>>> for Contour {
  fn from(points: Vec<Point<i32>>) -> Self {
    Contour::new(points)
  }
}

/// 从边缘图提取全部轮廓（树形检索，简单链编码）
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
  let contours: Vec<Contour> = imageproc::contours::find_contours::<i32>(edges)
    .into_iter()
    .map(|contour| Contour {
      points: compress_chain(&contour.points),
      parent: contour.parent,
      is_hole: contour.border_type == BorderType::Hole,
    })
    .collect();

  debug!("找到 {} 条轮廓", contours.len());
  contours
}

/// 简单链编码：水平、竖直与对角线段只保留端点
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
  let n = points.len();
  if n <= 2 {
    return points.to_vec();
  }

  let step = |from: Point<i32>, to: Point<i32>| ((to.x - from.x).signum(), (to.y - from.y).signum());

  let compressed: Vec<Point<i32>> = (0..n)
    .filter(|&i| {
      let prev = points[(i + n - 1) % n];
      let current = points[i];
      let next = points[(i + 1) % n];
      step(prev, current) != step(current, next)
    })
    .map(|i| points[i])
    .collect();

  if compressed.is_empty() {
    vec![points[0]]
  } else {
    compressed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Luma;

  fn p(x: i32, y: i32) -> Point<i32> {
    Point::new(x, y)
  }

  #[test]
  fn square_ring_keeps_only_corners() {
    let mut ring = Vec::new();
    for x in 0..4 {
      ring.push(p(x, 0));
    }
    for y in 0..4 {
      ring.push(p(4, y));
    }
    for x in (1..=4).rev() {
      ring.push(p(x, 4));
    }
    for y in (1..=4).rev() {
      ring.push(p(0, y));
    }
    let compressed = compress_chain(&ring);
    assert_eq!(compressed, vec![p(0, 0), p(4, 0), p(4, 4), p(0, 4)]);
  }

  #[test]
  fn diagonal_runs_are_compressed() {
    let ring = vec![p(0, 0), p(1, 1), p(2, 2), p(1, 2), p(0, 2), p(0, 1)];
    assert_eq!(compress_chain(&ring), vec![p(0, 0), p(2, 2), p(0, 2)]);
  }

  #[test]
  fn short_chains_are_untouched() {
    let chain = vec![p(3, 3), p(4, 3)];
    assert_eq!(compress_chain(&chain), chain);
  }

  #[test]
  fn blank_edge_map_has_no_contours() {
    let edges = GrayImage::new(16, 16);
    assert!(find_contours(&edges).is_empty());
  }

  #[test]
  fn filled_block_produces_outer_contour() {
    let mut edges = GrayImage::new(20, 20);
    for y in 5..15 {
      for x in 5..15 {
        edges.put_pixel(x, y, Luma([255]));
      }
    }
    let contours = find_contours(&edges);
    assert_eq!(contours.len(), 1);
    assert!(!contours[0].is_hole);
    assert_eq!(contours[0].parent, None);
    assert_eq!(contours[0].len(), 4);
  }

  #[test]
  fn ring_produces_hole_with_parent() {
    let mut edges = GrayImage::new(20, 20);
    for i in 4..16 {
      edges.put_pixel(i, 4, Luma([255]));
      edges.put_pixel(i, 15, Luma([255]));
      edges.put_pixel(4, i, Luma([255]));
      edges.put_pixel(15, i, Luma([255]));
    }
    let contours = find_contours(&edges);
    assert_eq!(contours.len(), 2);
    assert!(contours.iter().any(|c| c.is_hole && c.parent == Some(0)));
  }
}
