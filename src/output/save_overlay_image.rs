// 该文件是 Xingbian （形变） 项目的一部分。
// src/output/save_overlay_image.rs - 保存识别叠加图像
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

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  output::{Render, SceneResult, overlay::draw_recognition},
  url_to_path,
};

#[derive(Error, Debug)]
pub enum OverlayImageError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 把识别出的多边形画在原图上保存，便于排查分类结果
pub struct OverlayImageOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for OverlayImageOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for OverlayImageOutput {
  type Error = OverlayImageError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(OverlayImageError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(OverlayImageOutput {
      path: url_to_path(uri),
    })
  }
}

impl OverlayImageOutput {
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Render<ImageFrame, SceneResult> for OverlayImageOutput {
  type Error = OverlayImageError;

  fn render_result(&self, frame: &ImageFrame, result: &SceneResult) -> Result<(), Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let image = draw_recognition(frame.image(), &result.recognition);
    image.save(&self.path)?;

    info!("保存叠加图像到文件: {}", self.path.display());
    Ok(())
  }
}
