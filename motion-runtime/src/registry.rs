//! # Registry 模块
//!
//! 名称 → 动画模板的注册表。
//!
//! 注册表是显式对象，由调用方创建并交给 [`AnimationFactory`](crate::AnimationFactory)。
//! 模板在插入/加载时校验一次，之后实例化不再重复校验时间参数。

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::easing::Interpolation;
use crate::error::{MotionError, MotionResult};
use crate::template::{AnimationTemplate, EndResolver, Repeat, StepTemplate};
use crate::vector::Vec2;

/// 动画模板注册表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, AnimationTemplate>,
}

impl TemplateRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 文本加载（顶层是 `name → template` 对象）
    pub fn from_json(json: &str) -> MotionResult<Self> {
        let raw: BTreeMap<String, AnimationTemplate> = serde_json::from_str(json)?;
        let registry = Self::from_templates(raw)?;
        debug!(templates = registry.len(), "动画注册表加载完成");
        Ok(registry)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MotionError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// 从模板集合构造，逐个校验
    pub fn from_templates(
        templates: impl IntoIterator<Item = (String, AnimationTemplate)>,
    ) -> MotionResult<Self> {
        let mut registry = Self::new();
        for (name, template) in templates {
            registry.insert(name, template)?;
        }
        Ok(registry)
    }

    /// 插入模板（同名覆盖）
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        template: AnimationTemplate,
    ) -> MotionResult<()> {
        let name = name.into();
        template
            .validate()
            .map_err(|e| e.in_template(name.as_str()))?;
        self.templates.insert(name, template);
        Ok(())
    }

    /// 按名称查找模板
    pub fn get(&self, name: &str) -> MotionResult<&AnimationTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| MotionError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// 是否包含该名称
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// 所有模板名（有序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// 遍历所有模板
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnimationTemplate)> {
        self.templates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 模板数量
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// 合并另一个注册表（同名以 `other` 为准）
    pub fn extend(&mut self, other: TemplateRegistry) {
        self.templates.extend(other.templates);
    }

    /// 导出为 JSON
    pub fn to_json_pretty(&self) -> MotionResult<String> {
        Ok(serde_json::to_string_pretty(&self.templates)?)
    }

    /// 内置动画
    ///
    /// | 名称 | 说明 |
    /// |------|------|
    /// | `scroll_in_left` / `scroll_in_right` | 从屏幕外横向滚入 |
    /// | `scroll_out_left` / `scroll_out_right` | 横向滚出屏幕 |
    /// | `drop_in` | 从屏幕上方落下 |
    /// | `hold` | 原地停留 1 秒 |
    /// | `bob` | 上下浮动，无限循环 |
    /// | `shake` | 左右抖动三次后回到原位 |
    pub fn builtin() -> Self {
        let mut templates = BTreeMap::new();

        // 滚入：起点在屏幕外，位移 = 分辨率宽 + 主体宽
        let across = EndResolver::default()
            .with_resolution(Vec2::new(1.0, 0.0))
            .with_subject(Vec2::new(1.0, 0.0));
        let scroll = |end: EndResolver, easing| {
            AnimationTemplate::position(vec![StepTemplate::new(600.0, end).with_easing(easing)])
        };

        templates.insert(
            "scroll_in_left".to_string(),
            scroll(across, Interpolation::EaseOutCubic),
        );
        templates.insert(
            "scroll_in_right".to_string(),
            scroll(negate(across), Interpolation::EaseOutCubic),
        );
        templates.insert(
            "scroll_out_left".to_string(),
            scroll(negate(across), Interpolation::EaseInCubic),
        );
        templates.insert(
            "scroll_out_right".to_string(),
            scroll(across, Interpolation::EaseInCubic),
        );

        templates.insert(
            "drop_in".to_string(),
            AnimationTemplate::position(vec![
                StepTemplate::new(
                    800.0,
                    EndResolver::default()
                        .with_resolution(Vec2::new(0.0, 0.5))
                        .with_subject(Vec2::new(0.0, 0.5)),
                )
                .with_easing(Interpolation::EaseOutBounce),
            ]),
        );

        templates.insert(
            "hold".to_string(),
            AnimationTemplate::position(vec![StepTemplate::hold(1000.0)]),
        );

        templates.insert(
            "bob".to_string(),
            AnimationTemplate::position(vec![
                StepTemplate::new(500.0, EndResolver::fixed(Vec2::new(0.0, -6.0)))
                    .with_easing(Interpolation::EaseInOutSine),
                StepTemplate::new(500.0, EndResolver::fixed(Vec2::new(0.0, 6.0)))
                    .with_delay(500.0)
                    .with_easing(Interpolation::EaseInOutSine),
            ])
            .with_repeat(Repeat::Infinite),
        );

        templates.insert(
            "shake".to_string(),
            AnimationTemplate::position(vec![
                StepTemplate::new(40.0, EndResolver::fixed(Vec2::new(8.0, 0.0))),
                StepTemplate::new(80.0, EndResolver::fixed(Vec2::new(-16.0, 0.0))).with_delay(40.0),
                StepTemplate::new(40.0, EndResolver::fixed(Vec2::new(8.0, 0.0))).with_delay(120.0),
            ])
            .with_repeat(Repeat::Times(2)),
        );

        Self { templates }
    }
}

fn negate(end: EndResolver) -> EndResolver {
    EndResolver {
        offset: -end.offset,
        resolution: -end.resolution,
        subject: -end.subject,
    }
}
