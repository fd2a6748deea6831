// 该文件是 Xingbian （形变） 项目的一部分。
// src/output.rs - 输出定义
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
use url::Url;

use crate::FromUrl;
#[cfg(any(
  feature = "save_xml3d_file",
  feature = "directory_record",
  feature = "save_overlay_image"
))]
use crate::FromUrlWithScheme;
use crate::{deform::DeformOutcome, frame::ImageFrame, mesh::MeshModel, model::Recognition};

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

/// 一帧的处理结果：识别结果、形变结果与形变后的网格
#[derive(Debug, Clone)]
pub struct SceneResult {
  pub recognition: Recognition,
  pub outcome: DeformOutcome,
  pub mesh: MeshModel,
}

pub mod overlay;
pub mod xml3d;

#[cfg(feature = "save_xml3d_file")]
mod save_xml3d_file;
#[cfg(feature = "save_xml3d_file")]
pub use self::save_xml3d_file::{SaveXml3dFileError, SaveXml3dFileOutput};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[cfg(feature = "save_overlay_image")]
mod save_overlay_image;
#[cfg(feature = "save_overlay_image")]
pub use self::save_overlay_image::{OverlayImageError, OverlayImageOutput};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "save_xml3d_file")]
  #[error("保存 XML3D 文件错误: {0}")]
  SaveXml3dFileError(#[from] SaveXml3dFileError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[cfg(feature = "save_overlay_image")]
  #[error("保存叠加图像错误: {0}")]
  OverlayImageError(#[from] OverlayImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum OutputWrapper {
  #[cfg(feature = "save_xml3d_file")]
  SaveXml3dFileOutput(SaveXml3dFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
  #[cfg(feature = "save_overlay_image")]
  OverlayImageOutput(OverlayImageOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "save_xml3d_file")]
      SaveXml3dFileOutput::SCHEME => {
        let output = SaveXml3dFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveXml3dFileOutput(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      #[cfg(feature = "save_overlay_image")]
      OverlayImageOutput::SCHEME => {
        let output = OverlayImageOutput::from_url(url)?;
        Ok(OutputWrapper::OverlayImageOutput(output))
      }
      other => Err(OutputError::SchemeMismatch(other.to_string())),
    }
  }
}

impl Render<ImageFrame, SceneResult> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &ImageFrame, result: &SceneResult) -> Result<(), Self::Error> {
    match self {
      #[cfg(feature = "save_xml3d_file")]
      OutputWrapper::SaveXml3dFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "save_overlay_image")]
      OutputWrapper::OverlayImageOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = Url::parse("rtsp://localhost:8554/live").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Err(OutputError::SchemeMismatch(scheme)) if scheme == "rtsp"
    ));
  }

  #[cfg(feature = "save_xml3d_file")]
  #[test]
  fn xml3d_scheme_is_dispatched() {
    let url = Url::parse("xml3d:///tmp/out.xml3d").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Ok(OutputWrapper::SaveXml3dFileOutput(_))
    ));
  }
}
