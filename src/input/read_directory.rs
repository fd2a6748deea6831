// 该文件是 Xingbian （形变） 项目的一部分。
// src/input/read_directory.rs - 目录批量图像输入
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

use std::{collections::VecDeque, path::PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  input::{IMAGE_EXTENSIONS, frame_name},
  url_to_path,
};

#[derive(Error, Debug)]
pub enum DirectoryInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("不是目录: {0}")]
  NotADirectory(PathBuf),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 目录中的全部图像文件，按文件名排序逐个读取
///
/// 无法解码的文件会被跳过。
pub struct DirectoryInput {
  pending: VecDeque<PathBuf>,
}

impl FromUrlWithScheme for DirectoryInput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryInput {
  type Error = DirectoryInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!("URI 方案不匹配: {}", url.scheme());
      return Err(DirectoryInputError::SchemeMismatch);
    }

    let directory = url_to_path(url);
    if !directory.is_dir() {
      return Err(DirectoryInputError::NotADirectory(directory));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&directory)? {
      let path = entry?.path();
      let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
          IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
        });
      if path.is_file() && is_image {
        files.push(path);
      }
    }
    files.sort();

    info!("目录 {} 中共有 {} 张图像", directory.display(), files.len());
    Ok(DirectoryInput {
      pending: files.into(),
    })
  }
}

impl DirectoryInput {
  pub fn remaining(&self) -> usize {
    self.pending.len()
  }
}

impl Iterator for DirectoryInput {
  type Item = ImageFrame;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(path) = self.pending.pop_front() {
      let decoded = ImageReader::open(&path)
        .map_err(image::ImageError::from)
        .and_then(|reader| reader.decode());
      match decoded {
        Ok(image) => {
          debug!("读取图像: {}", path.display());
          return Some(ImageFrame::new(frame_name(&path), image.into_rgb8()));
        }
        Err(e) => warn!("跳过无法读取的文件 {}: {}", path.display(), e),
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  fn folder_url(path: &std::path::Path) -> Url {
    Url::parse(&format!("folder://{}", path.display())).unwrap()
  }

  #[test]
  fn yields_images_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.png", "a.png", "c.bmp"] {
      RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
        .save(dir.path().join(name))
        .unwrap();
    }
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let input = DirectoryInput::from_url(&folder_url(dir.path())).unwrap();
    assert_eq!(input.remaining(), 3);
    let names: Vec<String> = input.map(|frame| frame.name().to_string()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
  }

  #[test]
  fn broken_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.png"), b"broken").unwrap();
    RgbImage::new(2, 2).save(dir.path().join("b.png")).unwrap();

    let frames: Vec<ImageFrame> = DirectoryInput::from_url(&folder_url(dir.path()))
      .unwrap()
      .collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].name(), "b");
  }

  #[test]
  fn file_is_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.png");
    RgbImage::new(2, 2).save(&file).unwrap();
    assert!(matches!(
      DirectoryInput::from_url(&folder_url(&file)),
      Err(DirectoryInputError::NotADirectory(_))
    ));
  }
}
