// 该文件是 Xingbian （形变） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU16, Ordering};

use chrono::{DateTime, Datelike, Utc};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  output::{Render, SceneResult, overlay::draw_recognition, xml3d::to_xml3d},
  url_to_path,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 按日期分目录保存每一帧的网格与识别记录
///
/// 每帧生成 `<目录>/年/月/日/时-分-秒-序号-帧名.xml3d` 与同名 `.json`，
/// URL 带 `overlay` 参数时另存一张叠加图像。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: AtomicU16,
  overlay: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let overlay = uri.query_pairs().any(|(k, _)| k == "overlay");

    Ok(DirectoryRecordOutput {
      directory: url_to_path(uri),
      frame_counter: AtomicU16::new(0),
      overlay,
    })
  }
}

impl DirectoryRecordOutput {
  fn frame_id(&self) -> u16 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }

  fn frame_stem(&self, now: &DateTime<Utc>, name: &str) -> Result<PathBuf, std::io::Error> {
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    if !directory.exists() {
      std::fs::create_dir_all(&directory)?;
    }

    Ok(directory.join(format!(
      "{}-{:04X}-{}",
      now.format("%H-%M-%S"),
      self.frame_id(),
      name
    )))
  }

  fn record(
    &self,
    path: &Path,
    now: &DateTime<Utc>,
    frame: &ImageFrame,
    result: &SceneResult,
    mesh_file: &Path,
  ) -> Result<(), DirectoryRecordOutputError> {
    let recognition = &result.recognition;
    let polygon: Vec<[i32; 2]> = recognition.polygon.iter().map(|p| [p.x, p.y]).collect();
    let record = json!({
      "frame": frame.name(),
      "width": frame.width(),
      "height": frame.height(),
      "time": now.to_rfc3339(),
      "label": recognition.label.as_str(),
      "contours": recognition.contour_count,
      "contour_index": recognition.contour_index,
      "polygon": polygon,
      "deformed": !result.outcome.is_unknown(),
      "vertices": result.mesh.vertex_count(),
      "triangles": result.mesh.triangle_count(),
      "mesh": mesh_file.file_name().map(|name| name.to_string_lossy().into_owned()),
    });
    std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
    Ok(())
  }
}

// 帧名里可能带点号，不能用 `with_extension`
fn with_suffix(stem: &Path, extension: &str) -> PathBuf {
  let mut path = stem.as_os_str().to_owned();
  path.push(".");
  path.push(extension);
  PathBuf::from(path)
}

impl Render<ImageFrame, SceneResult> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &ImageFrame, result: &SceneResult) -> Result<(), Self::Error> {
    let now = Utc::now();
    let stem = self.frame_stem(&now, frame.name())?;

    let mesh_path = with_suffix(&stem, "xml3d");
    std::fs::write(&mesh_path, to_xml3d(&result.mesh))?;
    self.record(&with_suffix(&stem, "json"), &now, frame, result, &mesh_path)?;

    if self.overlay {
      draw_recognition(frame.image(), &result.recognition).save(with_suffix(&stem, "png"))?;
      debug!("已保存叠加图像");
    }

    info!("记录第 {} 帧到 {}", frame.name(), mesh_path.display());
    Ok(())
  }
}
