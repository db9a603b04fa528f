//! # Animation 模块
//!
//! 一组并行执行的 step（每帧增量求和），带可选的重复次数。
//!
//! 所有 step 都结束视为完成一遍；未满足重复次数时在同一次 `update` 内
//! 刷新全部 step 开始下一遍，不浪费帧。

use serde::Serialize;
use tracing::debug;

use crate::step::{AnimationStep, PlaybackState};
use crate::template::{AnimationKind, Repeat};
use crate::vector::Vec2;

/// 单帧输出
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationUpdate {
    /// 动画类型，消费者据此决定是否应用
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// 本帧位移增量
    pub delta: Vec2,
}

impl AnimationUpdate {
    /// 零增量
    pub fn idle(kind: AnimationKind) -> Self {
        Self {
            kind,
            delta: Vec2::ZERO,
        }
    }
}

/// 运行时动画
///
/// 独占自己的 step，step 不持有回指。
#[derive(Debug, Clone)]
pub struct Animation {
    kind: AnimationKind,
    repeat: Repeat,
    steps: Vec<AnimationStep>,
    /// 已完成并触发刷新的遍数
    iterations: u32,
    state: PlaybackState,
}

impl Animation {
    /// 由已构造的 step 组成动画
    pub fn new(kind: AnimationKind, repeat: Repeat, steps: Vec<AnimationStep>) -> Self {
        Self {
            kind,
            repeat,
            steps,
            iterations: 0,
            state: PlaybackState::Idle,
        }
    }

    /// 推进 `dt` 毫秒
    ///
    /// 返回所有 step 增量之和。完成并交付之后只返回零增量。
    pub fn update(&mut self, dt: f32) -> AnimationUpdate {
        if self.is_done() {
            return AnimationUpdate::idle(self.kind);
        }

        let delta: Vec2 = self.steps.iter_mut().map(|step| step.update(dt)).sum();

        let iterated = self.steps.iter().all(AnimationStep::is_done);
        let completed = iterated && self.repeat.is_satisfied_by(self.iterations);

        if iterated && !completed {
            self.iterations = self.iterations.saturating_add(1);
            self.steps.iter_mut().for_each(AnimationStep::refresh);
            debug!(
                kind = %self.kind,
                iteration = self.iterations,
                repeat = %self.repeat,
                "动画开始下一遍"
            );
        }

        if completed {
            self.state = PlaybackState::Reported;
            debug!(kind = %self.kind, iterations = self.iterations, "动画完成");
        } else {
            self.state = PlaybackState::Running;
        }

        AnimationUpdate {
            kind: self.kind,
            delta,
        }
    }

    /// 本遍尚未交付的总位移
    pub fn finish_delta(&self) -> Vec2 {
        self.steps.iter().map(AnimationStep::remaining_delta).sum()
    }

    /// 跳过动画：交付本遍剩余位移并立即锁定，不再重复
    ///
    /// 已完成的动画返回零增量。
    pub fn skip(&mut self) -> AnimationUpdate {
        if self.is_done() {
            return AnimationUpdate::idle(self.kind);
        }

        let delta: Vec2 = self.steps.iter_mut().map(AnimationStep::skip).sum();
        self.state = PlaybackState::Reported;
        debug!(kind = %self.kind, iterations = self.iterations, "动画被跳过");

        AnimationUpdate {
            kind: self.kind,
            delta,
        }
    }

    /// 完成且已交付最后一帧
    pub fn is_done(&self) -> bool {
        self.state.is_reported()
    }

    /// 动画类型
    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    /// 重复次数
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// 已完成并刷新的遍数
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// 当前状态
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// 所有 step
    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    /// step 数量
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
