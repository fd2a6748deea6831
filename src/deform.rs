// 该文件是 Xingbian （形变） 项目的一部分。
// src/deform.rs - 按形状标签形变网格
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

use tracing::debug;

use crate::{mesh::MeshModel, shape::ShapeLabel};

/// 所有位移函数共用的幅度
pub const AMPLITUDE: f64 = 0.1;

/// 顶点 (x, y) 到 z 方向位移（乘幅度前）的函数
pub type Displacement = fn(f64, f64) -> f64;

/// 用户提示：标签未知，网格未形变
pub const UNKNOWN_NOTICE: &str = "Unknown deformation type.";

const DISPLACEMENTS: [(ShapeLabel, Displacement); 8] = [
  (ShapeLabel::Triangle, sin_x),
  (ShapeLabel::Square, cos_x),
  (ShapeLabel::Rectangle, tan_x),
  (ShapeLabel::Pentagon, sin_sum),
  (ShapeLabel::Hexagon, cos_sum),
  (ShapeLabel::Octagon, tan_sum),
  (ShapeLabel::Circle, sin_product),
  (ShapeLabel::Ellipse, cos_product),
];

fn sin_x(x: f64, _: f64) -> f64 {
  x.sin()
}

fn cos_x(x: f64, _: f64) -> f64 {
  x.cos()
}

fn tan_x(x: f64, _: f64) -> f64 {
  x.tan()
}

fn sin_sum(x: f64, y: f64) -> f64 {
  (x + y).sin()
}

fn cos_sum(x: f64, y: f64) -> f64 {
  (x + y).cos()
}

fn tan_sum(x: f64, y: f64) -> f64 {
  (x + y).tan()
}

fn sin_product(x: f64, y: f64) -> f64 {
  (x * y).sin()
}

fn cos_product(x: f64, y: f64) -> f64 {
  (x * y).cos()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeformOutcome {
  /// 已按该标签叠加位移
  Applied(ShapeLabel),
  /// 标签没有对应的位移函数，网格未改动
  Unknown,
}

impl DeformOutcome {
  pub fn is_unknown(&self) -> bool {
    matches!(self, DeformOutcome::Unknown)
  }
}

pub fn displacement_for(label: ShapeLabel) -> Option<Displacement> {
  DISPLACEMENTS
    .iter()
    .find(|(entry, _)| *entry == label)
    .map(|(_, displacement)| *displacement)
}

/// 对每个顶点执行 `z += 0.1 * f(x, y)`，重复调用会累加
pub fn deform(mesh: &mut MeshModel, label: ShapeLabel) -> DeformOutcome {
  let Some(displacement) = displacement_for(label) else {
    return DeformOutcome::Unknown;
  };

  for position in mesh.positions_mut() {
    position.z += AMPLITUDE * displacement(position.x, position.y);
  }
  debug!("按 {} 形变了 {} 个顶点", label, mesh.vertex_count());

  DeformOutcome::Applied(label)
}
