// 该文件是 Xingbian （形变） 项目的一部分。
// src/shape.rs - 形状标签与形状分类器
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

pub mod circle;
pub mod ellipse;
pub mod moments;
pub mod polygon;

pub use circle::{Circle, circularity, min_enclosing_circle};
pub use ellipse::{RotatedEllipse, ellipse_to_poly, fit_ellipse};
pub use moments::{Moments, hu_moments, match_shapes_i3};
pub use polygon::{approx_polygon_dp, bounding_rect};

use std::{fmt, ops::RangeInclusive, str::FromStr};

use imageproc::{geometry::arc_length, point::Point};
use tracing::{debug, trace};

use crate::vision::Contour;

/// 多边形逼近容差相对轮廓周长的比例
pub const APPROX_EPSILON_FACTOR: f64 = 0.04;
/// 外接矩形宽高比落在此区间内视为正方形
pub const SQUARE_RATIO: RangeInclusive<f32> = 0.95..=1.05;
/// 圆度与 1 的最大偏差
pub const CIRCULARITY_TOLERANCE: f64 = 0.2;
/// 拟合椭圆与轮廓的形状距离上限（不含）
pub const ELLIPSE_MATCH_THRESHOLD: f64 = 0.2;
/// 重建拟合椭圆多边形时的角度步长（度）
pub const ELLIPSE_POLY_DELTA: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
  Triangle,
  Square,
  Rectangle,
  Pentagon,
  Hexagon,
  Octagon,
  Circle,
  Ellipse,
  Unknown,
}

impl ShapeLabel {
  pub const ALL: [ShapeLabel; 9] = [
    ShapeLabel::Triangle,
    ShapeLabel::Square,
    ShapeLabel::Rectangle,
    ShapeLabel::Pentagon,
    ShapeLabel::Hexagon,
    ShapeLabel::Octagon,
    ShapeLabel::Circle,
    ShapeLabel::Ellipse,
    ShapeLabel::Unknown,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      ShapeLabel::Triangle => "triangle",
      ShapeLabel::Square => "square",
      ShapeLabel::Rectangle => "rectangle",
      ShapeLabel::Pentagon => "pentagon",
      ShapeLabel::Hexagon => "hexagon",
      ShapeLabel::Octagon => "octagon",
      ShapeLabel::Circle => "circle",
      ShapeLabel::Ellipse => "ellipse",
      ShapeLabel::Unknown => "unknown",
    }
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self, ShapeLabel::Unknown)
  }
}

impl fmt::Display for ShapeLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// 不区分大小写，无法识别的名称一律视为 `Unknown`
impl FromStr for ShapeLabel {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let name = s.trim();
    Ok(
      ShapeLabel::ALL
        .into_iter()
        .find(|label| label.as_str().eq_ignore_ascii_case(name))
        .unwrap_or(ShapeLabel::Unknown),
    )
  }
}

/// 一次分类的详细结果
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
  pub label: ShapeLabel,
  /// 给出标签的轮廓序号，`Unknown` 时为 `None`
  pub contour_index: Option<usize>,
  /// 该轮廓的逼近多边形
  pub polygon: Vec<Point<i32>>,
}

impl Classification {
  fn unknown() -> Self {
    Self {
      label: ShapeLabel::Unknown,
      contour_index: None,
      polygon: Vec::new(),
    }
  }
}

/// 按轮廓顺序逐个判别，第一个给出标签的轮廓决定结果
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeClassifier;

impl ShapeClassifier {
  pub fn new() -> Self {
    Self
  }

  pub fn classify(&self, contours: &[Contour]) -> ShapeLabel {
    self.classify_detailed(contours).label
  }

  pub fn classify_detailed(&self, contours: &[Contour]) -> Classification {
    let found = contours.iter().enumerate().find_map(|(index, contour)| {
      let polygon = self.approximate(&contour.points);
      self
        .label_polygon(&contour.points, &polygon)
        .map(|label| Classification {
          label,
          contour_index: Some(index),
          polygon,
        })
    });

    match found {
      Some(result) => {
        debug!(
          "第 {:?} 个轮廓判定为 {}（{} 个顶点）",
          result.contour_index,
          result.label,
          result.polygon.len()
        );
        result
      }
      None => {
        debug!("{} 个轮廓均未给出形状", contours.len());
        Classification::unknown()
      }
    }
  }

  /// 单个轮廓的判别，未能判定时返回 `None`
  pub fn classify_contour(&self, contour: &Contour) -> Option<ShapeLabel> {
    let polygon = self.approximate(&contour.points);
    self.label_polygon(&contour.points, &polygon)
  }

  pub fn is_circle(&self, points: &[Point<i32>]) -> bool {
    circularity(points).is_some_and(|value| (1.0 - value).abs() <= CIRCULARITY_TOLERANCE)
  }

  pub fn is_ellipse(&self, points: &[Point<i32>]) -> bool {
    let Some(fitted) = fit_ellipse(points) else {
      return false;
    };
    let regenerated = ellipse_to_poly(
      Point::new(fitted.center.x as i32, fitted.center.y as i32),
      ((fitted.size.0 / 2.0) as i32, (fitted.size.1 / 2.0) as i32),
      fitted.angle as i32,
      0,
      360,
      ELLIPSE_POLY_DELTA,
    );
    let distance = match_shapes_i3(&regenerated, points);
    trace!("椭圆拟合 {:?}，形状距离 {}", fitted, distance);
    distance < ELLIPSE_MATCH_THRESHOLD
  }

  fn approximate(&self, points: &[Point<i32>]) -> Vec<Point<i32>> {
    let epsilon = APPROX_EPSILON_FACTOR * arc_length(points, true);
    approx_polygon_dp(points, epsilon)
  }

  fn label_polygon(&self, points: &[Point<i32>], polygon: &[Point<i32>]) -> Option<ShapeLabel> {
    trace!("轮廓 {} 个点，逼近为 {} 个顶点", points.len(), polygon.len());
    match polygon.len() {
      3 => Some(ShapeLabel::Triangle),
      4 => {
        let rect = bounding_rect(polygon)?;
        let ratio = rect.width() as f32 / rect.height() as f32;
        if SQUARE_RATIO.contains(&ratio) {
          Some(ShapeLabel::Square)
        } else {
          Some(ShapeLabel::Rectangle)
        }
      }
      5 => Some(ShapeLabel::Pentagon),
      6 => Some(ShapeLabel::Hexagon),
      8 => Some(ShapeLabel::Octagon),
      n if n > 8 => {
        if self.is_circle(points) {
          Some(ShapeLabel::Circle)
        } else if self.is_ellipse(points) {
          Some(ShapeLabel::Ellipse)
        } else {
          None
        }
      }
      _ => None,
    }
  }
}


#[cfg(test)]
mod tests {
  use super::testing::{densify, regular, slit_ellipse};
  use super::*;

  fn contour(points: Vec<Point<i32>>) -> Contour {
    Contour::from(points)
  }

  #[test]
  fn label_names_round_trip() {
    for label in ShapeLabel::ALL {
      assert_eq!(label.to_string().parse::<ShapeLabel>(), Ok(label));
    }
    assert_eq!("Circle".parse::<ShapeLabel>(), Ok(ShapeLabel::Circle));
    assert_eq!(" HEXAGON ".parse::<ShapeLabel>(), Ok(ShapeLabel::Hexagon));
    assert_eq!("star".parse::<ShapeLabel>(), Ok(ShapeLabel::Unknown));
  }

  #[test]
  fn regular_polygons_by_vertex_count() {
    let classifier = ShapeClassifier::new();
    let expected = [
      (3, ShapeLabel::Triangle),
      (4, ShapeLabel::Square),
      (5, ShapeLabel::Pentagon),
      (6, ShapeLabel::Hexagon),
      (8, ShapeLabel::Octagon),
    ];
    for (n, label) in expected {
      assert_eq!(
        classifier.classify_contour(&contour(regular(n))),
        Some(label),
        "{} 边形",
        n
      );
    }
  }

  #[test]
  fn heptagon_falls_through() {
    let classifier = ShapeClassifier::new();
    assert_eq!(classifier.classify_contour(&contour(regular(7))), None);
    assert_eq!(classifier.classify(&[contour(regular(7))]), ShapeLabel::Unknown);
  }

  #[test]
  fn aspect_ratio_separates_square_from_rectangle() {
    let classifier = ShapeClassifier::new();
    let square = densify(&[(50.0, 50.0), (150.0, 50.0), (150.0, 150.0), (50.0, 150.0)]);
    let rectangle = densify(&[(50.0, 50.0), (150.0, 50.0), (150.0, 110.0), (50.0, 110.0)]);
    assert_eq!(classifier.classify(&[contour(square)]), ShapeLabel::Square);
    assert_eq!(classifier.classify(&[contour(rectangle)]), ShapeLabel::Rectangle);
  }

  #[test]
  fn first_decisive_contour_wins() {
    let classifier = ShapeClassifier::new();
    let contours = vec![contour(regular(7)), contour(regular(3)), contour(regular(5))];
    let result = classifier.classify_detailed(&contours);
    assert_eq!(result.label, ShapeLabel::Triangle);
    assert_eq!(result.contour_index, Some(1));
    assert_eq!(result.polygon.len(), 3);
  }

  #[test]
  fn jagged_outline_with_many_vertices_falls_through() {
    // 五段锯齿带：逼近后 10 个顶点，既不圆也不像椭圆
    let zigzag = densify(&[
      (60.0, 160.0),
      (100.0, 80.0),
      (140.0, 160.0),
      (180.0, 80.0),
      (220.0, 160.0),
      (260.0, 80.0),
      (260.0, 110.0),
      (220.0, 190.0),
      (180.0, 110.0),
      (140.0, 190.0),
      (100.0, 110.0),
      (60.0, 190.0),
    ]);
    let classifier = ShapeClassifier::new();
    assert_eq!(classifier.approximate(&zigzag).len(), 10);
    assert!(!classifier.is_circle(&zigzag));
    assert!(!classifier.is_ellipse(&zigzag));

    let contours = vec![contour(zigzag), contour(regular(3))];
    assert_eq!(classifier.classify_contour(&contours[0]), None);
    let result = classifier.classify_detailed(&contours);
    assert_eq!(result.label, ShapeLabel::Triangle);
    assert_eq!(result.contour_index, Some(1));
  }

  #[test]
  fn no_contours_is_unknown() {
    let result = ShapeClassifier::new().classify_detailed(&[]);
    assert_eq!(result.label, ShapeLabel::Unknown);
    assert_eq!(result.contour_index, None);
    assert!(result.polygon.is_empty());
  }

  #[test]
  fn tiny_contour_gives_no_label() {
    let dot = contour(vec![Point::new(3, 3), Point::new(4, 3)]);
    assert_eq!(ShapeClassifier::new().classify(&[dot]), ShapeLabel::Unknown);
  }

  #[test]
  fn notched_circle_is_circle() {
    let points = slit_ellipse(100.0, 100.0, &[0, 90, 180, 270], 0.9);
    let classifier = ShapeClassifier::new();
    assert!(classifier.is_circle(&points));
    assert_eq!(classifier.classify(&[contour(points)]), ShapeLabel::Circle);
  }

  #[test]
  fn notched_ellipse_is_ellipse() {
    let points = slit_ellipse(100.0, 75.0, &[0, 90, 180, 270], 0.9);
    let classifier = ShapeClassifier::new();
    assert!(!classifier.is_circle(&points));
    assert!(classifier.is_ellipse(&points));
    assert_eq!(classifier.classify(&[contour(points)]), ShapeLabel::Ellipse);
  }

  #[test]
  fn plain_circle_outline_reads_as_octagon() {
    // 光滑圆周在 0.04 倍周长的容差下逼近为 8 个顶点
    let points = slit_ellipse(100.0, 100.0, &[], 0.0);
    let classifier = ShapeClassifier::new();
    assert!(classifier.is_circle(&points));
    assert_eq!(classifier.classify(&[contour(points)]), ShapeLabel::Octagon);
  }
}
