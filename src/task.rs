// 该文件是 Xingbian （形变） 项目的一部分。
// src/task.rs - 识别与形变任务
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

use std::{thread, time::Duration};
use tracing::{info, warn};

use crate::{
  deform::{DeformOutcome, UNKNOWN_NOTICE, deform},
  mesh::MeshModel,
  model::{Model, Recognition},
  output::{Render, SceneResult},
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 识别一帧并在模板网格的副本上形变
pub fn process_frame<F, M>(model: &M, template: &MeshModel, frame: &F) -> anyhow::Result<SceneResult>
where
  M: Model<Input = F, Output = Recognition>,
  M::Error: std::error::Error + Sync + Send + 'static,
{
  let recognition = model.infer(frame)?;
  let mut mesh = template.clone();
  let outcome = deform(&mut mesh, recognition.label);

  match outcome {
    DeformOutcome::Applied(label) => info!("已按 {} 形变网格", label),
    DeformOutcome::Unknown => {
      warn!("{}", UNKNOWN_NOTICE);
      eprintln!("{}", UNKNOWN_NOTICE);
    }
  }

  Ok(SceneResult {
    recognition,
    outcome,
    mesh,
  })
}

/// 只处理第一帧
#[derive(Default, Debug)]
pub struct OneShotTask {
  mesh: MeshModel,
}

impl OneShotTask {
  pub fn with_mesh(mut self, mesh: MeshModel) -> Self {
    self.mesh = mesh;
    self
  }
}

impl<
  F,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: Model<Input = F, Output = Recognition, Error = ME>,
  O: Render<F, SceneResult, Error = RE>,
> Task<I, M, O> for OneShotTask
{
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入帧"))?;
    info!("输入帧获取成功，开始识别...");
    let now = std::time::Instant::now();
    let result = process_frame(&model, &self.mesh, &frame)?;
    let elapsed = now.elapsed();
    info!("识别与形变完成，耗时: {:.2?}", elapsed);
    output.render_result(&frame, &result)?;
    info!("输出完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

/// 逐帧处理，每帧使用模板网格的独立副本
#[derive(Default, Debug)]
pub struct ContinuousTask {
  frame_number: Option<usize>,
  mesh: MeshModel,
}

impl ContinuousTask {
  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number;
    self
  }

  pub fn with_mesh(mut self, mesh: MeshModel) -> Self {
    self.mesh = mesh;
    self
  }
}

impl<
  F,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = F>,
  M: Model<Input = F, Output = Recognition, Error = ME>,
  O: Render<F, SceneResult, Error = RE>,
> Task<I, M, O> for ContinuousTask
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    let (tx, rx) = std::sync::mpsc::channel();

    let registered = ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      let _ = tx.send(());
      thread::spawn(|| {
        thread::sleep(Duration::from_secs(30));
        warn!("强制退出程序");
        std::process::exit(1);
      });
    });
    if let Err(e) = registered {
      warn!("无法注册中断处理: {}", e);
    }

    let mut frame_index = 0;
    let mut now = std::time::Instant::now();
    for frame in input {
      frame_index += 1;
      info!("处理第 {} 帧图像", frame_index);
      let result = process_frame(&model, &self.mesh, &frame)?;
      let elapsed_a = now.elapsed();
      output.render_result(&frame, &result)?;
      let elapsed_b = now.elapsed();
      now = std::time::Instant::now();
      info!("处理完成，耗时: {:.2?} / {:.2?}", elapsed_a, elapsed_b);
      if self.frame_number.is_some_and(|n| frame_index >= n) {
        info!("达到指定帧数 {}, 退出任务循环", frame_index);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    info!("任务完成，共处理 {} 帧", frame_index);
    Ok(())
  }
}
