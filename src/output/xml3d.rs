// 该文件是 Xingbian （形变） 项目的一部分。
// src/output/xml3d.rs - 网格的 XML3D 序列化
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

use std::io::Write;

use crate::mesh::MeshModel;

/// 把网格写成 `<xml3d>` 文档，不带 XML 声明与命名空间
///
/// 顶点坐标依次排成一串以空格分隔的数，三角形索引同样展平。
pub fn write_xml3d<W: Write>(writer: &mut W, mesh: &MeshModel) -> std::io::Result<()> {
  writeln!(writer, "<xml3d>")?;
  writeln!(writer, "  <defs>")?;
  writeln!(writer, "    <mesh type=\"triangles\">")?;

  write!(writer, "      <float3 name=\"position\">")?;
  let coordinates = mesh.positions().iter().flat_map(|p| [p.x, p.y, p.z]);
  for (i, value) in coordinates.enumerate() {
    if i > 0 {
      write!(writer, " ")?;
    }
    write!(writer, "{}", value)?;
  }
  writeln!(writer, "</float3>")?;

  write!(writer, "      <int name=\"index\">")?;
  let indices = mesh.triangles().iter().flatten();
  for (i, index) in indices.enumerate() {
    if i > 0 {
      write!(writer, " ")?;
    }
    write!(writer, "{}", index)?;
  }
  writeln!(writer, "</int>")?;

  writeln!(writer, "    </mesh>")?;
  writeln!(writer, "  </defs>")?;
  writeln!(writer, "</xml3d>")?;
  Ok(())
}

pub fn to_xml3d(mesh: &MeshModel) -> String {
  let mut buffer = Vec::new();
  // 写入内存缓冲区不会失败
  let _ = write_xml3d(&mut buffer, mesh);
  String::from_utf8_lossy(&buffer).into_owned()
}
