//! # Consumer 模块
//!
//! 动画的使用方：每个实体独占一个 [`Animation`]，每帧调用 `update(dt)`，
//! 把增量加到自己的位置上。
//!
//! ## 实现示例
//!
//! ```rust,ignore
//! struct Label {
//!     text: String,
//!     position: Vec2,
//! }
//!
//! impl Positioned for Label {
//!     fn position(&self) -> Vec2 {
//!         self.position
//!     }
//!
//!     fn set_position(&mut self, position: Vec2) {
//!         self.position = position;
//!     }
//! }
//!
//! let animation = factory.build("scroll_in_left", Some(label_size))?;
//! let mut label = Animated::new(label, animation);
//! // 每帧
//! label.update(dt_ms);
//! ```

use crate::animation::{Animation, AnimationUpdate};
use crate::template::AnimationKind;
use crate::vector::Vec2;

/// 有位置的实体
pub trait Positioned {
    /// 当前位置
    fn position(&self) -> Vec2;

    /// 设置新位置
    fn set_position(&mut self, position: Vec2);

    /// 平移
    fn translate(&mut self, delta: Vec2) {
        let position = self.position();
        self.set_position(position + delta);
    }
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }

    fn set_position(&mut self, position: Vec2) {
        *self = position;
    }
}

/// 带动画的实体
#[derive(Debug, Clone)]
pub struct Animated<T> {
    target: T,
    animation: Animation,
}

impl<T: Positioned> Animated<T> {
    /// 包装实体和它的动画
    pub fn new(target: T, animation: Animation) -> Self {
        Self { target, animation }
    }

    /// 推进一帧并应用增量
    ///
    /// # 返回
    /// - `true`: 动画仍在进行中
    /// - `false`: 动画已结束
    pub fn update(&mut self, dt: f32) -> bool {
        let update = self.animation.update(dt);
        self.apply(update);
        !self.animation.is_done()
    }

    /// 跳过动画，直接移动到本遍终点
    pub fn skip(&mut self) {
        let update = self.animation.skip();
        self.apply(update);
    }

    fn apply(&mut self, update: AnimationUpdate) {
        match update.kind {
            AnimationKind::Position => self.target.translate(update.delta),
        }
    }

    /// 动画是否已结束
    pub fn is_done(&self) -> bool {
        self.animation.is_done()
    }

    /// 替换动画，返回旧动画
    pub fn replace_animation(&mut self, animation: Animation) -> Animation {
        std::mem::replace(&mut self.animation, animation)
    }

    /// 当前动画
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// 实体
    pub fn target(&self) -> &T {
        &self.target
    }

    /// 实体（可变）
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// 取出实体，丢弃动画
    pub fn into_inner(self) -> T {
        self.target
    }
}
