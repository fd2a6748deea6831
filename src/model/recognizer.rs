// 该文件是 Xingbian （形变） 项目的一部分。
// src/model/recognizer.rs - 形状识别流程
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

use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  model::{Model, Recognition},
  shape::ShapeClassifier,
  vision::{CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, VisionError, extract_edges, find_contours},
};

#[derive(Error, Debug)]
pub enum ShapeRecognizerError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch { expected: &'static str, found: String },
  #[error("参数 {name} 的值 '{value}' 无效")]
  InvalidParameter { name: String, value: String },
  #[error("视觉处理错误: {0}")]
  Vision(#[from] VisionError),
}

/// 边缘提取、轮廓查找与形状分类串成的识别流程
///
/// 通过 `shape://canny?low=50&high=150` 形式的 URL 构造，参数均可省略。
#[derive(Debug, Clone)]
pub struct ShapeRecognizer {
  low_threshold: f32,
  high_threshold: f32,
  classifier: ShapeClassifier,
}

impl Default for ShapeRecognizer {
  fn default() -> Self {
    Self {
      low_threshold: CANNY_LOW_THRESHOLD,
      high_threshold: CANNY_HIGH_THRESHOLD,
      classifier: ShapeClassifier::new(),
    }
  }
}

impl ShapeRecognizer {
  pub fn with_thresholds(mut self, low: f32, high: f32) -> Self {
    self.low_threshold = low;
    self.high_threshold = high;
    self
  }

  pub fn thresholds(&self) -> (f32, f32) {
    (self.low_threshold, self.high_threshold)
  }
}

impl FromUrlWithScheme for ShapeRecognizer {
  const SCHEME: &'static str = "shape";
}

impl FromUrl for ShapeRecognizer {
  type Error = ShapeRecognizerError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!("模型 URI 方案不匹配: {}", url.scheme());
      return Err(ShapeRecognizerError::SchemeMismatch {
        expected: Self::SCHEME,
        found: url.scheme().to_string(),
      });
    }

    let (mut low, mut high) = (CANNY_LOW_THRESHOLD, CANNY_HIGH_THRESHOLD);
    for (key, value) in url.query_pairs() {
      let parse = || {
        value
          .parse::<f32>()
          .map_err(|_| ShapeRecognizerError::InvalidParameter {
            name: key.to_string(),
            value: value.to_string(),
          })
      };
      match key.as_ref() {
        "low" => low = parse()?,
        "high" => high = parse()?,
        other => debug!("忽略未知参数: {}", other),
      }
    }

    info!("形状识别参数: low = {}, high = {}", low, high);
    Ok(ShapeRecognizer::default().with_thresholds(low, high))
  }
}

impl Model for ShapeRecognizer {
  type Input = ImageFrame;
  type Output = Recognition;
  type Error = ShapeRecognizerError;

  fn infer(&self, input: &ImageFrame) -> Result<Recognition, ShapeRecognizerError> {
    debug!("识别图像 {}: {}x{}", input.name(), input.width(), input.height());
    let edges = extract_edges(input.image(), self.low_threshold, self.high_threshold)?;
    let contours = find_contours(&edges);
    let classification = self.classifier.classify_detailed(&contours);

    info!(
      "{}: {} 个轮廓，识别结果 {}",
      input.name(),
      contours.len(),
      classification.label
    );
    Ok(Recognition {
      label: classification.label,
      contour_count: contours.len(),
      contour_index: classification.contour_index,
      polygon: classification.polygon,
    })
  }
}
