//! # Step 模块
//!
//! 单个计时片段：延迟 + 时长 + 终点解析器 + 插值函数。
//!
//! 每次 `update(dt)` 把累计时间换算成本帧的位移增量。
//! 最后一帧的真实增量只交付一次，之后 step 静默返回零向量。

use tracing::trace;

use crate::error::MotionResult;
use crate::template::{AnimationContext, StepTemplate};
use crate::vector::Vec2;

/// 播放状态
///
/// step 与 animation 共用的显式状态机：
///
/// ```text
/// Idle ──► Running ──► Completed ──► Reported
///   ▲                                   │
///   └────────────── refresh ────────────┘
/// ```
///
/// - `Completed`：时间上已经结束，但最后的增量尚未交付。只在 `update` 内部短暂存在，
///   返回前总会变为 `Reported`，调用方观察不到
/// - `Reported`：最后的增量已交付，之后的 update 都是空操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// 尚未开始（未更新或仍在延迟中）
    #[default]
    Idle,
    /// 正在播放
    Running,
    /// 已结束，最后的增量尚未交付（`update` 内部的过渡状态）
    Completed,
    /// 已结束且已交付
    Reported,
}

impl PlaybackState {
    /// 是否已交付最后的增量
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported)
    }
}

/// 运行时 step
///
/// 由 [`StepTemplate`] 绑定 [`AnimationContext`] 构造，上下文之后不可变。
#[derive(Debug, Clone)]
pub struct AnimationStep {
    template: StepTemplate,
    context: AnimationContext,
    /// 自 step 开始（含延迟）累计的毫秒数
    current_time: f32,
    state: PlaybackState,
}

impl AnimationStep {
    /// 创建新的 step
    ///
    /// 拒绝负数/非有限的时间参数、非有限的上下文，以及缺少终点所需上下文的情况。
    pub fn new(template: StepTemplate, context: AnimationContext) -> MotionResult<Self> {
        template.validate()?;
        context.validate()?;
        template.end.check_context(&context)?;

        Ok(Self {
            template,
            context,
            current_time: 0.0,
            state: PlaybackState::Idle,
        })
    }

    /// 推进 `dt` 毫秒，返回本帧的位移增量
    ///
    /// 延迟期间和交付完成之后都返回零向量。跨过结束时刻的那一帧是最后一次
    /// 交付，增量恰好补齐到终点，不会超出。
    pub fn update(&mut self, dt: f32) -> Vec2 {
        let dt = dt.max(0.0);
        self.current_time += dt;

        if self.is_done() || self.current_time < self.template.delay_ms {
            return Vec2::ZERO;
        }

        self.state = if self.current_time >= self.template.total_ms() {
            PlaybackState::Completed
        } else {
            PlaybackState::Running
        };

        let delta = self.delta_since(dt);

        if self.state == PlaybackState::Completed {
            self.state = PlaybackState::Reported;
            trace!(
                delay_ms = self.template.delay_ms,
                duration_ms = self.template.duration_ms,
                "step 完成"
            );
        }

        delta
    }

    /// 本帧增量：当前百分比处的位移减去上一帧百分比处的位移
    fn delta_since(&self, dt: f32) -> Vec2 {
        let adj_time = self.current_time - self.template.delay_ms;
        let adj_dt = adj_time.min(dt);
        let (previous, current) = self.window_percents(adj_time, adj_dt);

        let end = self.end_point();
        let easing = self.template.easing;
        easing.interpolate(current, end) - easing.interpolate(previous, end)
    }

    /// 计算上一帧与本帧在时长窗口内的百分比
    ///
    /// 零时长的 step 在第一次跨过延迟的那一帧直接从 0 跳到 1，与 `dt` 大小无关。
    fn window_percents(&self, adj_time: f32, adj_dt: f32) -> (f32, f32) {
        let duration = self.template.duration_ms;
        if duration <= 0.0 {
            return (0.0, 1.0);
        }

        // NaN（无穷大 dt 相减）经 max 归零
        let previous = ((adj_time - adj_dt) / duration).max(0.0).min(1.0);
        let current = (adj_time / duration).max(0.0).min(1.0);
        (previous, current)
    }

    /// 交付完成后为 true
    pub fn is_done(&self) -> bool {
        self.state.is_reported()
    }

    /// 重置为初始状态，用于下一轮重复
    pub fn refresh(&mut self) {
        self.current_time = 0.0;
        self.state = PlaybackState::Idle;
    }

    /// 立即结束，返回本轮尚未交付的位移
    ///
    /// 已交付的 step 返回零向量。
    pub fn skip(&mut self) -> Vec2 {
        if self.is_done() {
            return Vec2::ZERO;
        }

        let remaining = self.remaining_delta();
        self.current_time = self.current_time.max(self.template.total_ms());
        self.state = PlaybackState::Reported;
        remaining
    }

    /// 本轮尚未交付的位移
    pub fn remaining_delta(&self) -> Vec2 {
        if self.is_done() {
            return Vec2::ZERO;
        }
        let end = self.end_point();
        end - self.template.easing.interpolate(self.progress(), end)
    }

    /// 已交付部分对应的完成百分比
    pub fn progress(&self) -> f32 {
        match self.state {
            PlaybackState::Idle => 0.0,
            PlaybackState::Completed | PlaybackState::Reported => 1.0,
            PlaybackState::Running => {
                let duration = self.template.duration_ms;
                if duration <= 0.0 {
                    return 1.0;
                }
                ((self.current_time - self.template.delay_ms) / duration).clamp(0.0, 1.0)
            }
        }
    }

    /// 根据绑定的上下文求终点
    pub fn end_point(&self) -> Vec2 {
        self.template.end.resolve(&self.context)
    }

    /// 已累计的时间（毫秒）
    pub fn elapsed_ms(&self) -> f32 {
        self.current_time
    }

    /// 延迟 + 时长（毫秒）
    pub fn total_ms(&self) -> f32 {
        self.template.total_ms()
    }

    /// 当前状态
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// 构造时使用的模板
    pub fn template(&self) -> &StepTemplate {
        &self.template
    }

    /// 绑定的上下文
    pub fn context(&self) -> &AnimationContext {
        &self.context
    }
}
