//! # Easing 模块
//!
//! 插值函数库。插值函数把 `(完成百分比, 终点)` 映射为位移向量，
//! 隐含起点为零向量，无状态。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

/// 插值函数
///
/// 所有曲线都满足 `apply(0) == 0`、`apply(1) == 1`，
/// 因此 `interpolate(1, end) == end`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    EaseOutCubic,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 正弦缓入
    EaseInSine,
    /// 正弦缓出
    EaseOutSine,
    /// 正弦缓入缓出
    EaseInOutSine,
    /// 弹性缓出
    EaseOutElastic,
    /// 弹跳缓出
    EaseOutBounce,
}

impl Interpolation {
    /// 全部插值函数（用于诊断输出和测试）
    pub const ALL: [Interpolation; 12] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseOutElastic,
        Self::EaseOutBounce,
    ];

    /// 计算曲线值
    ///
    /// # 参数
    /// - `t`: 完成百分比 (0.0 - 1.0)，超出范围会被截断
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInSine => ease_in_sine(t),
            Self::EaseOutSine => ease_out_sine(t),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseOutBounce => ease_out_bounce(t),
        }
    }

    /// 在给定百分比处求位移
    ///
    /// 起点固定为零向量，调用方把结果当作相对 step 起点的位移。
    pub fn interpolate(&self, percent: f32, end: Vec2) -> Vec2 {
        match self {
            // 线性插值保持精确的标量缩放
            Self::Linear => end * percent.clamp(0.0, 1.0),
            _ => end * self.apply(percent),
        }
    }
}

/// 正弦缓入，端点精确
fn ease_in_sine(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - (t * PI / 2.0).cos()
    }
}

/// 正弦缓出，端点精确
fn ease_out_sine(t: f32) -> f32 {
    if t >= 1.0 { 1.0 } else { (t * PI / 2.0).sin() }
}

/// 弹性缓出
fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// 弹跳缓出
fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t >= 1.0 {
        1.0
    } else if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}
