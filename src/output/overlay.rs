// 该文件是 Xingbian （形变） 项目的一部分。
// src/output/overlay.rs - 识别结果叠加绘制
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

use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut},
  rect::Rect,
};

use crate::{model::Recognition, shape::ShapeLabel};

const VERTEX_RADIUS: i32 = 3;
const LINE_THICKNESS: i32 = 2;
const SWATCH_SIZE: u32 = 12;
const VERTEX_COLOR: [u8; 3] = [255, 255, 0];

/// 每种标签的描边颜色，未知为灰色
pub fn label_color(label: ShapeLabel) -> [u8; 3] {
  match label {
    ShapeLabel::Triangle => [255, 64, 64],
    ShapeLabel::Square => [64, 255, 64],
    ShapeLabel::Rectangle => [64, 160, 255],
    ShapeLabel::Pentagon => [255, 160, 0],
    ShapeLabel::Hexagon => [200, 64, 255],
    ShapeLabel::Octagon => [0, 220, 220],
    ShapeLabel::Circle => [255, 0, 160],
    ShapeLabel::Ellipse => [160, 255, 0],
    ShapeLabel::Unknown => [128, 128, 128],
  }
}

/// 在图像副本上描出决定结果的多边形，并在左上角画出标签色块
pub fn draw_recognition(image: &RgbImage, recognition: &Recognition) -> RgbImage {
  let mut canvas = image.clone();
  let color = Rgb(label_color(recognition.label));

  let polygon = &recognition.polygon;
  let n = polygon.len();
  if n >= 2 {
    for i in 0..n {
      let a = polygon[i];
      let b = polygon[(i + 1) % n];
      // 沿法向平移几次以加粗
      for offset in 0..LINE_THICKNESS {
        let o = offset as f32;
        draw_line_segment_mut(
          &mut canvas,
          (a.x as f32 + o, a.y as f32),
          (b.x as f32 + o, b.y as f32),
          color,
        );
        draw_line_segment_mut(
          &mut canvas,
          (a.x as f32, a.y as f32 + o),
          (b.x as f32, b.y as f32 + o),
          color,
        );
      }
    }
  }
  for vertex in polygon {
    draw_filled_circle_mut(&mut canvas, (vertex.x, vertex.y), VERTEX_RADIUS, Rgb(VERTEX_COLOR));
  }

  if canvas.width() > 0 && canvas.height() > 0 {
    let swatch = Rect::at(0, 0).of_size(
      SWATCH_SIZE.min(canvas.width()),
      SWATCH_SIZE.min(canvas.height()),
    );
    draw_filled_rect_mut(&mut canvas, swatch, color);
  }

  canvas
}

#[cfg(test)]
mod tests {
  use super::*;
  use imageproc::point::Point;

  fn recognition(label: ShapeLabel, polygon: Vec<Point<i32>>) -> Recognition {
    Recognition {
      label,
      contour_count: 1,
      contour_index: Some(0),
      polygon,
    }
  }

  #[test]
  fn polygon_is_traced_on_a_copy() {
    let image = RgbImage::new(64, 64);
    let square = vec![
      Point::new(20, 20),
      Point::new(40, 20),
      Point::new(40, 40),
      Point::new(20, 40),
    ];
    let drawn = draw_recognition(&image, &recognition(ShapeLabel::Square, square));

    assert_eq!(image.get_pixel(30, 20), &Rgb([0, 0, 0]));
    assert_eq!(drawn.get_pixel(30, 20), &Rgb(label_color(ShapeLabel::Square)));
    assert_eq!(drawn.get_pixel(20, 20), &Rgb(VERTEX_COLOR));
    assert_eq!(drawn.get_pixel(30, 30), &Rgb([0, 0, 0]));
  }

  #[test]
  fn swatch_marks_the_label() {
    let image = RgbImage::new(32, 32);
    let drawn = draw_recognition(&image, &recognition(ShapeLabel::Unknown, Vec::new()));
    assert_eq!(drawn.get_pixel(0, 0), &Rgb([128, 128, 128]));
    assert_eq!(drawn.get_pixel(20, 20), &Rgb([0, 0, 0]));
  }

  #[test]
  fn tiny_image_is_handled() {
    let image = RgbImage::new(4, 4);
    let drawn = draw_recognition(&image, &recognition(ShapeLabel::Circle, Vec::new()));
    assert_eq!(drawn.dimensions(), (4, 4));
  }

  #[test]
  fn colors_are_distinct() {
    for (i, a) in ShapeLabel::ALL.iter().enumerate() {
      for b in &ShapeLabel::ALL[i + 1..] {
        assert_ne!(label_color(*a), label_color(*b));
      }
    }
  }
}
