// 该文件是 Xingbian （形变） 项目的一部分。
// src/mesh.rs - 三角网格
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

use nalgebra::Point3;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
  #[error("三角形 {triangle} 引用了不存在的顶点 {index}（共 {vertex_count} 个顶点）")]
  IndexOutOfRange {
    triangle: usize,
    index: usize,
    vertex_count: usize,
  },
}

/// 顶点坐标加三角形索引的网格
#[derive(Debug, Clone, PartialEq)]
pub struct MeshModel {
  positions: Vec<Point3<f64>>,
  triangles: Vec<[usize; 3]>,
}

impl MeshModel {
  pub fn new(positions: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Result<Self, MeshError> {
    let vertex_count = positions.len();
    for (triangle, indices) in triangles.iter().enumerate() {
      if let Some(&index) = indices.iter().find(|&&index| index >= vertex_count) {
        return Err(MeshError::IndexOutOfRange {
          triangle,
          index,
          vertex_count,
        });
      }
    }

    Ok(Self {
      positions,
      triangles,
    })
  }

  /// 位于 z = 0 平面、覆盖 [-1, 1]² 的四边形，由两个三角形组成
  pub fn demo_quad() -> Self {
    Self {
      positions: vec![
        Point3::new(-1.0, -1.0, 0.0),
        Point3::new(1.0, -1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(-1.0, 1.0, 0.0),
      ],
      triangles: vec![[0, 1, 2], [2, 3, 0]],
    }
  }

  pub fn positions(&self) -> &[Point3<f64>] {
    &self.positions
  }

  /// 只开放坐标的修改，索引保持有效
  pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
    &mut self.positions
  }

  pub fn triangles(&self) -> &[[usize; 3]] {
    &self.triangles
  }

  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.triangles.len()
  }
}

impl Default for MeshModel {
  fn default() -> Self {
    Self::demo_quad()
  }
}
