//! # Trace 模块
//!
//! 以固定帧时长驱动一个动画，记录每帧的增量与累计位置。
//! 用于无界面模拟和测试。

use serde::Serialize;

use crate::animation::Animation;
use crate::vector::Vec2;

/// 单帧记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSample {
    /// 帧序号（从 1 开始）
    pub frame: usize,
    /// 累计时间（毫秒）
    pub elapsed_ms: f32,
    /// 本帧增量
    pub delta: Vec2,
    /// 应用增量后的位置
    pub position: Vec2,
    /// 本帧之后动画是否已结束
    pub done: bool,
}

/// 模拟结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// 起始位置
    pub start: Vec2,
    /// 每帧记录
    pub frames: Vec<FrameSample>,
    /// 是否在帧数上限内结束
    pub finished: bool,
}

impl Trace {
    /// 最终位置
    pub fn end_position(&self) -> Vec2 {
        self.frames.last().map_or(self.start, |f| f.position)
    }

    /// 总位移
    pub fn total_delta(&self) -> Vec2 {
        self.frames.iter().map(|f| f.delta).sum()
    }

    /// 总时长（毫秒）
    pub fn elapsed_ms(&self) -> f32 {
        self.frames.last().map_or(0.0, |f| f.elapsed_ms)
    }
}

/// 以固定帧时长运行动画，直到结束或达到 `max_frames`
pub fn trace(animation: &mut Animation, frame_ms: f32, max_frames: usize, start: Vec2) -> Trace {
    let mut frames = Vec::new();
    let mut position = start;
    let mut elapsed_ms = 0.0;

    for frame in 1..=max_frames {
        if animation.is_done() {
            break;
        }

        let update = animation.update(frame_ms);
        elapsed_ms += frame_ms;
        position += update.delta;

        frames.push(FrameSample {
            frame,
            elapsed_ms,
            delta: update.delta,
            position,
            done: animation.is_done(),
        });
    }

    Trace {
        start,
        frames,
        finished: animation.is_done(),
    }
}
