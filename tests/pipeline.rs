// 该文件是 Xingbian （形变） 项目的一部分。
// tests/pipeline.rs - 从图像到网格的完整流程测试
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
  drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut},
  point::Point,
  rect::Rect,
};
use url::Url;

use xingbian::{
  FromUrl,
  deform::{DeformOutcome, deform},
  frame::ImageFrame,
  input::InputWrapper,
  mesh::MeshModel,
  model::{Model, ShapeRecognizer, ShapeRecognizerError},
  output::{OutputWrapper, xml3d::to_xml3d},
  shape::{ShapeClassifier, ShapeLabel, circularity},
  task::{ContinuousTask, OneShotTask, Task},
  vision::{CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, VisionError, extract_edges, find_contours},
};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn canvas() -> RgbImage {
  RgbImage::new(200, 200)
}

fn rect_image(width: u32, height: u32) -> RgbImage {
  let mut image = canvas();
  draw_filled_rect_mut(&mut image, Rect::at(50, 50).of_size(width, height), WHITE);
  image
}

fn triangle_image() -> RgbImage {
  let mut image = canvas();
  draw_polygon_mut(
    &mut image,
    &[Point::new(50, 150), Point::new(150, 150), Point::new(100, 63)],
    WHITE,
  );
  image
}

fn disk_image() -> RgbImage {
  let mut image = canvas();
  draw_filled_circle_mut(&mut image, (100, 100), 60, WHITE);
  image
}

fn classify(image: &RgbImage) -> ShapeLabel {
  let edges = extract_edges(image, CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD).unwrap();
  ShapeClassifier::new().classify(&find_contours(&edges))
}

#[test]
fn square_image_is_square() {
  assert_eq!(classify(&rect_image(100, 100)), ShapeLabel::Square);
}

#[test]
fn wide_rectangle_image_is_rectangle() {
  assert_eq!(classify(&rect_image(100, 60)), ShapeLabel::Rectangle);
}

#[test]
fn triangle_image_is_triangle() {
  assert_eq!(classify(&triangle_image()), ShapeLabel::Triangle);
}

#[test]
fn blank_image_is_unknown() {
  assert_eq!(classify(&canvas()), ShapeLabel::Unknown);
}

#[test]
fn disk_outline_is_nearly_circular() {
  let edges = extract_edges(&disk_image(), CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD).unwrap();
  let contours = find_contours(&edges);
  let outer = contours.first().unwrap();

  let value = circularity(&outer.points).unwrap();
  assert!((1.0 - value).abs() <= 0.2, "圆度 {}", value);
  assert!(ShapeClassifier::new().is_circle(&outer.points));
}

#[test]
fn zero_sized_image_is_invalid() {
  let err = extract_edges(&RgbImage::new(0, 10), 50.0, 150.0).unwrap_err();
  assert!(matches!(err, VisionError::InvalidImage { width: 0, height: 10 }));

  let frame = ImageFrame::new("empty", RgbImage::new(10, 0));
  assert!(matches!(
    ShapeRecognizer::default().infer(&frame),
    Err(ShapeRecognizerError::Vision(VisionError::InvalidImage { .. }))
  ));
}

#[test]
fn square_label_deforms_demo_quad() {
  let recognition = ShapeRecognizer::default()
    .infer(&ImageFrame::new("square", rect_image(100, 100)))
    .unwrap();
  let mut mesh = MeshModel::demo_quad();
  assert_eq!(deform(&mut mesh, recognition.label), DeformOutcome::Applied(ShapeLabel::Square));

  let z: Vec<f64> = mesh.positions().iter().map(|p| p.z).collect();
  let expected = [
    0.1 * (-1.0f64).cos(),
    0.1 * 1.0f64.cos(),
    0.1 * 1.0f64.cos(),
    0.1 * (-1.0f64).cos(),
  ];
  for (a, b) in z.iter().zip(expected) {
    assert!((a - b).abs() < 1e-12);
  }
  assert!((z[0] - z[3]).abs() < 1e-15);
  assert!((z[1] - z[2]).abs() < 1e-15);
}

#[test]
fn exported_token_counts() {
  let mut mesh = MeshModel::demo_quad();
  deform(&mut mesh, ShapeLabel::Pentagon);
  let document = to_xml3d(&mesh);

  let float_text = document
    .split("<float3 name=\"position\">")
    .nth(1)
    .and_then(|rest| rest.split("</float3>").next())
    .unwrap();
  let int_text = document
    .split("<int name=\"index\">")
    .nth(1)
    .and_then(|rest| rest.split("</int>").next())
    .unwrap();
  assert_eq!(float_text.split_whitespace().count(), 3 * mesh.vertex_count());
  assert_eq!(int_text.split_whitespace().count(), 3 * mesh.triangle_count());
}

#[test]
fn one_shot_from_file_to_xml3d() {
  let dir = tempfile::tempdir().unwrap();
  let input_path = dir.path().join("triangle.png");
  let output_path = dir.path().join("out").join("mesh.xml3d");
  triangle_image().save(&input_path).unwrap();

  let input = InputWrapper::from_url(&Url::parse(&format!("image://{}", input_path.display())).unwrap())
    .unwrap();
  let model = ShapeRecognizer::from_url(&Url::parse("shape://canny?low=50&high=150").unwrap()).unwrap();
  let output =
    OutputWrapper::from_url(&Url::parse(&format!("xml3d://{}", output_path.display())).unwrap())
      .unwrap();

  OneShotTask::default().run_task(input, model, output).unwrap();

  let mut expected = MeshModel::demo_quad();
  deform(&mut expected, ShapeLabel::Triangle);
  assert_eq!(std::fs::read_to_string(&output_path).unwrap(), to_xml3d(&expected));
}

#[test]
fn unknown_frame_still_exports_unchanged_mesh() {
  let dir = tempfile::tempdir().unwrap();
  let input_path = dir.path().join("blank.png");
  let output_path = dir.path().join("blank.xml3d");
  canvas().save(&input_path).unwrap();

  let input = InputWrapper::from_url(&Url::parse(&format!("image://{}", input_path.display())).unwrap())
    .unwrap();
  let output =
    OutputWrapper::from_url(&Url::parse(&format!("xml3d://{}", output_path.display())).unwrap())
      .unwrap();

  OneShotTask::default()
    .run_task(input, ShapeRecognizer::default(), output)
    .unwrap();
  assert_eq!(
    std::fs::read_to_string(&output_path).unwrap(),
    to_xml3d(&MeshModel::demo_quad())
  );
}

#[test]
fn folder_batch_records_every_frame() {
  let source = tempfile::tempdir().unwrap();
  let records = tempfile::tempdir().unwrap();
  rect_image(100, 100).save(source.path().join("a_square.png")).unwrap();
  rect_image(100, 60).save(source.path().join("b_rectangle.png")).unwrap();
  triangle_image().save(source.path().join("c_triangle.png")).unwrap();

  let input = InputWrapper::from_url(&Url::parse(&format!("folder://{}", source.path().display())).unwrap())
    .unwrap();
  let output =
    OutputWrapper::from_url(&Url::parse(&format!("folder://{}", records.path().display())).unwrap())
      .unwrap();

  ContinuousTask::default()
    .run_task(input, ShapeRecognizer::default(), output)
    .unwrap();

  let mut labels = Vec::new();
  let mut stack = vec![records.path().to_path_buf()];
  while let Some(dir) = stack.pop() {
    for entry in std::fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        stack.push(path);
      } else if path.extension().is_some_and(|e| e == "json") {
        let record: serde_json::Value =
          serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        labels.push((
          record["frame"].as_str().unwrap().to_string(),
          record["label"].as_str().unwrap().to_string(),
        ));
      }
    }
  }
  labels.sort();
  assert_eq!(
    labels,
    vec![
      ("a_square".to_string(), "square".to_string()),
      ("b_rectangle".to_string(), "rectangle".to_string()),
      ("c_triangle".to_string(), "triangle".to_string()),
    ]
  );
}
