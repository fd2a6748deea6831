// 该文件是 Xingbian （形变） 项目的一部分。
// src/shape/circle.rs - 最小外接圆与圆度
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

use std::f64::consts::PI;

use imageproc::{geometry::contour_area, point::Point};

const CONTAINS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
  pub center: Point<f64>,
  pub radius: f64,
}

impl Circle {
  fn around(p: Point<f64>) -> Self {
    Circle {
      center: p,
      radius: 0.0,
    }
  }

  fn from_diameter(a: Point<f64>, b: Point<f64>) -> Self {
    Circle {
      center: Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5),
      radius: (a.x - b.x).hypot(a.y - b.y) * 0.5,
    }
  }

  fn through(a: Point<f64>, b: Point<f64>, c: Point<f64>) -> Self {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2.0 * (bx * cy - by * cx);

    // 三点共线时取最长边为直径
    if d.abs() < 1e-12 {
      return [
        Circle::from_diameter(a, b),
        Circle::from_diameter(a, c),
        Circle::from_diameter(b, c),
      ]
      .into_iter()
      .fold(Circle::around(a), |best, circle| {
        if circle.radius > best.radius { circle } else { best }
      });
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    Circle {
      center: Point::new(a.x + ux, a.y + uy),
      radius: ux.hypot(uy),
    }
  }

  pub fn contains(&self, p: Point<f64>) -> bool {
    let d = (p.x - self.center.x).hypot(p.y - self.center.y);
    d <= self.radius * (1.0 + CONTAINS_TOLERANCE) + CONTAINS_TOLERANCE
  }

  pub fn area(&self) -> f64 {
    PI * self.radius * self.radius
  }
}

/// 最小外接圆（增量 Welzl 算法）
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
  let points: Vec<Point<f64>> = points
    .iter()
    .map(|p| Point::new(p.x as f64, p.y as f64))
    .collect();
  let first = *points.first()?;

  let mut circle = Circle::around(first);
  for i in 1..points.len() {
    if circle.contains(points[i]) {
      continue;
    }
    circle = Circle::around(points[i]);
    for j in 0..i {
      if circle.contains(points[j]) {
        continue;
      }
      circle = Circle::from_diameter(points[i], points[j]);
      for k in 0..j {
        if !circle.contains(points[k]) {
          circle = Circle::through(points[i], points[j], points[k]);
        }
      }
    }
  }
  Some(circle)
}

/// 轮廓面积与最小外接圆面积之比
pub fn circularity(points: &[Point<i32>]) -> Option<f64> {
  let circle = min_enclosing_circle(points)?;
  if circle.radius <= 0.0 {
    return None;
  }
  Some(contour_area(points) / circle.area())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn p(x: i32, y: i32) -> Point<i32> {
    Point::new(x, y)
  }

  #[test]
  fn enclosing_circle_of_square_passes_corners() {
    let circle = min_enclosing_circle(&[p(0, 0), p(10, 0), p(10, 10), p(0, 10), p(5, 5)]).unwrap();
    assert!((circle.center.x - 5.0).abs() < 1e-9);
    assert!((circle.center.y - 5.0).abs() < 1e-9);
    assert!((circle.radius - 50f64.sqrt()).abs() < 1e-9);
  }

  #[test]
  fn enclosing_circle_of_triangle_is_circumcircle() {
    // 锐角三角形的外接圆经过三个顶点
    let circle = min_enclosing_circle(&[p(0, 0), p(8, 0), p(4, 6)]).unwrap();
    for q in [p(0, 0), p(8, 0), p(4, 6)] {
      let d = (q.x as f64 - circle.center.x).hypot(q.y as f64 - circle.center.y);
      assert!((d - circle.radius).abs() < 1e-9);
    }
  }

  #[test]
  fn collinear_points_use_the_longest_span() {
    let circle = min_enclosing_circle(&[p(0, 0), p(3, 0), p(10, 0)]).unwrap();
    assert!((circle.radius - 5.0).abs() < 1e-9);
  }

  #[test]
  fn every_point_is_enclosed() {
    let points: Vec<Point<i32>> = (0..50)
      .map(|i| {
        let t = i as f64 * 0.37;
        p((40.0 * t.cos() + 7.0 * (3.0 * t).sin()) as i32, (25.0 * t.sin()) as i32)
      })
      .collect();
    let circle = min_enclosing_circle(&points).unwrap();
    for q in &points {
      assert!(circle.contains(Point::new(q.x as f64, q.y as f64)));
    }
  }

  #[test]
  fn square_circularity_is_two_over_pi() {
    let value = circularity(&[p(0, 0), p(10, 0), p(10, 10), p(0, 10)]).unwrap();
    assert!((value - 2.0 / PI).abs() < 1e-9);
  }

  #[test]
  fn degenerate_inputs_have_no_circularity() {
    assert!(circularity(&[]).is_none());
    assert!(circularity(&[p(3, 3), p(3, 3)]).is_none());
  }
}
