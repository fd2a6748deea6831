// 该文件是 Xingbian （形变） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::Parser;
use url::Url;

/// Xingbian 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 识别模型，例如 shape://canny?low=50&high=150
  #[arg(long, value_name = "MODEL", default_value = "shape://canny?low=50&high=150")]
  pub model: Url,

  /// 输入来源
  /// 支持格式:
  /// - 单张图片: image:///path/to/shape.png
  /// - 图片目录: folder:///path/to/images
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,

  /// 输出路径
  /// 支持格式:
  /// - 网格文件: xml3d:///path/to/mesh.xml3d
  /// - 记录目录: folder:///path/to/records（加 ?overlay 同时保存叠加图像）
  /// - 叠加图像: image:///path/to/overlay.png
  #[arg(long, value_name = "OUTPUT")]
  pub output: Url,

  /// 最大处理帧数（0 表示无限制）
  #[arg(long, default_value = "0", value_name = "COUNT")]
  pub max_frames: usize,
}

impl Args {
  pub fn frame_limit(&self) -> Option<usize> {
    (self.max_frames > 0).then_some(self.max_frames)
  }
}
