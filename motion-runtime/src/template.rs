//! # Template 模块
//!
//! 声明式动画模板：与上下文无关、可复用，由 [`crate::factory`] 绑定上下文后实例化。
//!
//! ## JSON 格式
//!
//! ```json
//! {
//!   "type": "Position",
//!   "repeat": 0,
//!   "steps": [
//!     { "delay_ms": 0, "duration_ms": 400, "easing": "EaseOutCubic",
//!       "end": { "resolution": [1, 0], "subject": [1, 0] } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::easing::Interpolation;
use crate::error::{ContextField, MotionError, MotionResult};
use crate::vector::Vec2;

/// 动画类型标签
///
/// 消费者根据类型决定如何应用增量；目前只有位置动画。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationKind {
    /// 位置位移
    #[default]
    Position,
}

impl std::fmt::Display for AnimationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => write!(f, "Position"),
        }
    }
}

/// 重复次数
///
/// `Times(0)` 表示只播放一遍。JSON 中写作整数或 `"infinite"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RepeatRepr", into = "RepeatRepr")]
pub enum Repeat {
    /// 额外重复的次数
    Times(u32),
    /// 永不结束
    Infinite,
}

impl Repeat {
    /// 只播放一遍
    pub const ONCE: Self = Self::Times(0);

    /// 已完成 `iterations` 次刷新后，是否满足结束条件
    pub fn is_satisfied_by(&self, iterations: u32) -> bool {
        match self {
            Self::Times(n) => iterations >= *n,
            Self::Infinite => false,
        }
    }

    /// 是否无限重复
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Self::ONCE
    }
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Times(n) => write!(f, "{n}"),
            Self::Infinite => write!(f, "infinite"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Times(u32),
    Keyword(RepeatKeyword),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RepeatKeyword {
    Infinite,
}

impl From<RepeatRepr> for Repeat {
    fn from(repr: RepeatRepr) -> Self {
        match repr {
            RepeatRepr::Times(n) => Self::Times(n),
            RepeatRepr::Keyword(RepeatKeyword::Infinite) => Self::Infinite,
        }
    }
}

impl From<Repeat> for RepeatRepr {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Times(n) => Self::Times(n),
            Repeat::Infinite => Self::Keyword(RepeatKeyword::Infinite),
        }
    }
}

/// 运行时上下文
///
/// 构造时捕获一次，之后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationContext {
    /// 动画主体尺寸（文本/精灵大小等）
    pub subject: Option<Vec2>,
    /// 屏幕分辨率
    pub resolution: Option<Vec2>,
}

impl AnimationContext {
    /// 空上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置主体尺寸
    pub fn with_subject(mut self, subject: Vec2) -> Self {
        self.subject = Some(subject);
        self
    }

    /// 设置分辨率
    pub fn with_resolution(mut self, resolution: Vec2) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// 检查已提供的上下文是否为有限值
    ///
    /// 即使终点不需要某项上下文也要检查：`NaN * 0` 仍然是 `NaN`。
    pub fn validate(&self) -> MotionResult<()> {
        for (field, v) in [("subject", self.subject), ("resolution", self.resolution)] {
            if v.is_some_and(|v| !v.is_finite()) {
                return Err(MotionError::InvalidEndpoint { field });
            }
        }
        Ok(())
    }
}

/// 终点解析器
///
/// `end = offset + resolution ⊙ ctx.resolution + subject ⊙ ctx.subject`（逐分量乘积）。
/// 非零的系数表示需要对应的上下文。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndResolver {
    /// 固定偏移
    #[serde(default, skip_serializing_if = "Vec2::is_zero")]
    pub offset: Vec2,
    /// 分辨率系数
    #[serde(default, skip_serializing_if = "Vec2::is_zero")]
    pub resolution: Vec2,
    /// 主体尺寸系数
    #[serde(default, skip_serializing_if = "Vec2::is_zero")]
    pub subject: Vec2,
}

impl EndResolver {
    /// 固定终点
    pub fn fixed(offset: Vec2) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    /// 叠加分辨率系数
    pub fn with_resolution(mut self, factor: Vec2) -> Self {
        self.resolution = factor;
        self
    }

    /// 叠加主体尺寸系数
    pub fn with_subject(mut self, factor: Vec2) -> Self {
        self.subject = factor;
        self
    }

    /// 是否需要主体尺寸
    pub fn needs_subject(&self) -> bool {
        !self.subject.is_zero()
    }

    /// 是否需要分辨率
    pub fn needs_resolution(&self) -> bool {
        !self.resolution.is_zero()
    }

    /// 检查上下文是否满足需求
    pub fn check_context(&self, context: &AnimationContext) -> MotionResult<()> {
        if self.needs_subject() && context.subject.is_none() {
            return Err(MotionError::MissingContext {
                field: ContextField::Subject,
            });
        }
        if self.needs_resolution() && context.resolution.is_none() {
            return Err(MotionError::MissingContext {
                field: ContextField::Resolution,
            });
        }
        Ok(())
    }

    /// 检查所有系数是否为有限值
    pub fn validate(&self) -> MotionResult<()> {
        for (field, v) in [
            ("end.offset", self.offset),
            ("end.resolution", self.resolution),
            ("end.subject", self.subject),
        ] {
            if !v.is_finite() {
                return Err(MotionError::InvalidEndpoint { field });
            }
        }
        Ok(())
    }

    /// 根据上下文求终点
    ///
    /// 缺失的上下文按零向量处理；需要它的解析器在构造时已被拒绝。
    pub fn resolve(&self, context: &AnimationContext) -> Vec2 {
        let resolution = context.resolution.unwrap_or_default();
        let subject = context.subject.unwrap_or_default();
        self.offset
            + self.resolution.component_mul(resolution)
            + self.subject.component_mul(subject)
    }
}

/// 单个 step 的模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepTemplate {
    /// 开始前的延迟（毫秒）
    #[serde(default)]
    pub delay_ms: f32,
    /// 持续时间（毫秒）
    #[serde(default)]
    pub duration_ms: f32,
    /// 终点解析器
    #[serde(default)]
    pub end: EndResolver,
    /// 插值函数
    #[serde(default)]
    pub easing: Interpolation,
}

impl StepTemplate {
    /// 创建新的 step 模板
    pub fn new(duration_ms: f32, end: EndResolver) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms,
            end,
            easing: Interpolation::Linear,
        }
    }

    /// 只等待、不产生位移的 step
    pub fn hold(duration_ms: f32) -> Self {
        Self::new(duration_ms, EndResolver::default())
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// 设置插值函数
    pub fn with_easing(mut self, easing: Interpolation) -> Self {
        self.easing = easing;
        self
    }

    /// 延迟与时长之和
    pub fn total_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    /// 校验时间参数与终点参数
    pub fn validate(&self) -> MotionResult<()> {
        check_timing("delay_ms", self.delay_ms)?;
        check_timing("duration_ms", self.duration_ms)?;
        self.end.validate()
    }
}

fn check_timing(field: &'static str, value: f32) -> MotionResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MotionError::InvalidTiming { field, value })
    }
}

/// 动画模板
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationTemplate {
    /// 动画类型
    #[serde(rename = "type", default)]
    pub kind: AnimationKind,
    /// 重复次数
    #[serde(default)]
    pub repeat: Repeat,
    /// 并行执行的 step
    #[serde(default)]
    pub steps: Vec<StepTemplate>,
}

impl AnimationTemplate {
    /// 创建位置动画模板
    pub fn position(steps: Vec<StepTemplate>) -> Self {
        Self {
            kind: AnimationKind::Position,
            repeat: Repeat::ONCE,
            steps,
        }
    }

    /// 设置重复次数
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// 追加一个 step
    pub fn with_step(mut self, step: StepTemplate) -> Self {
        self.steps.push(step);
        self
    }

    /// 校验所有 step
    pub fn validate(&self) -> MotionResult<()> {
        self.steps.iter().try_for_each(StepTemplate::validate)
    }

    /// 是否有 step 需要主体尺寸
    pub fn needs_subject(&self) -> bool {
        self.steps.iter().any(|s| s.end.needs_subject())
    }

    /// 是否有 step 需要分辨率
    pub fn needs_resolution(&self) -> bool {
        self.steps.iter().any(|s| s.end.needs_resolution())
    }

    /// 单遍播放的时长（最长 step 的延迟 + 时长）
    pub fn pass_ms(&self) -> f32 {
        self.steps
            .iter()
            .map(StepTemplate::total_ms)
            .fold(0.0, f32::max)
    }
}
