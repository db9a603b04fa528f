//! # Motion Runtime
//!
//! 时间驱动的位移动画引擎。
//!
//! ## 架构概述
//!
//! 引擎只把经过的真实时间换算成每帧的位移增量，不负责绘制，也不持有实体：
//!
//! ```text
//! Consumer                       Animation
//!   │                              │
//!   │──── update(dt_ms) ─────────►│ 各 step 并行推进，增量求和
//!   │◄─── AnimationUpdate ────────│ { kind, delta }
//!   │                              │
//!   │ position += delta            │
//! ```
//!
//! ## 核心类型
//!
//! - [`Interpolation`]：插值函数 `(百分比, 终点) → 位移`
//! - [`AnimationStep`]：单个计时片段（延迟 + 时长 + 终点 + 插值）
//! - [`Animation`]：并行 step 的组合，带重复次数
//! - [`AnimationFactory`]：按名称从 [`TemplateRegistry`] 构造动画
//! - [`Animated`]：把动画增量应用到 [`Positioned`] 实体上
//!
//! ## 使用示例
//!
//! ```ignore
//! use motion_runtime::{AnimationFactory, TemplateRegistry, Vec2};
//!
//! let registry = TemplateRegistry::load("assets/animations/default.json")?;
//! let factory = AnimationFactory::new(registry).with_resolution(Vec2::new(1920.0, 1080.0));
//!
//! let mut animation = factory.build("scroll_in_left", Some(Vec2::new(240.0, 32.0)))?;
//! let mut position = Vec2::new(-240.0, 500.0);
//!
//! // 主循环
//! loop {
//!     let update = animation.update(frame_ms);
//!     position += update.delta;
//!     if animation.is_done() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`vector`]：二维向量
//! - [`easing`]：插值函数库
//! - [`template`]：声明式模板与上下文
//! - [`step`]：运行时 step 与播放状态
//! - [`animation`]：运行时动画
//! - [`registry`]：模板注册表
//! - [`factory`]：模板实例化
//! - [`consumer`]：动画使用方
//! - [`diagnostic`]：注册表静态检查
//! - [`trace`]：固定帧模拟
//! - [`error`]：错误类型定义

pub mod animation;
pub mod consumer;
pub mod diagnostic;
pub mod easing;
pub mod error;
pub mod factory;
pub mod registry;
pub mod step;
pub mod template;
pub mod trace;
pub mod vector;

// 重导出核心类型
pub use animation::{Animation, AnimationUpdate};
pub use consumer::{Animated, Positioned};
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_json, analyze_registry,
};
pub use easing::Interpolation;
pub use error::{ContextField, MotionError, MotionResult};
pub use factory::{AnimationFactory, get_animation};
pub use registry::TemplateRegistry;
pub use step::{AnimationStep, PlaybackState};
pub use template::{
    AnimationContext, AnimationKind, AnimationTemplate, EndResolver, Repeat, StepTemplate,
};
pub use trace::{FrameSample, Trace, trace};
pub use vector::Vec2;
