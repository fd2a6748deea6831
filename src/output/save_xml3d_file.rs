// 该文件是 Xingbian （形变） 项目的一部分。
// src/output/save_xml3d_file.rs - 保存 XML3D 文件
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

use std::{
  fs::File,
  io::BufWriter,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  output::{Render, SceneResult, xml3d::write_xml3d},
  url_to_path,
};

#[derive(Error, Debug)]
pub enum SaveXml3dFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

/// 把形变后的网格写到固定路径，多帧时后写入的覆盖先写入的
pub struct SaveXml3dFileOutput {
  path: PathBuf,
}

impl FromUrlWithScheme for SaveXml3dFileOutput {
  const SCHEME: &'static str = "xml3d";
}

impl FromUrl for SaveXml3dFileOutput {
  type Error = SaveXml3dFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveXml3dFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(SaveXml3dFileOutput {
      path: url_to_path(uri),
    })
  }
}

impl SaveXml3dFileOutput {
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl Render<ImageFrame, SceneResult> for SaveXml3dFileOutput {
  type Error = SaveXml3dFileError;

  fn render_result(&self, _frame: &ImageFrame, result: &SceneResult) -> Result<(), Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(&self.path)?);
    write_xml3d(&mut writer, &result.mesh)?;
    writer.into_inner().map_err(|e| e.into_error())?;

    info!("保存网格到文件: {}", self.path.display());
    Ok(())
  }
}
