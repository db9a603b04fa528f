//! # Factory 模块
//!
//! 把与上下文无关的模板实例化为绑定上下文的 [`Animation`]。
//!
//! 模板描述"动画长什么样"（作者编写，可复用），上下文描述"动画的是谁、
//! 在什么屏幕上"（运行时，每个实体一份）。同一个模板可以用于不同尺寸的
//! 实体和不同分辨率。

use tracing::debug;

use crate::animation::Animation;
use crate::error::MotionResult;
use crate::registry::TemplateRegistry;
use crate::step::AnimationStep;
use crate::template::{AnimationContext, AnimationTemplate};
use crate::vector::Vec2;

/// 按模板和上下文构造动画
///
/// 每个 step 模板对应一个 step，全部绑定同一个上下文。
pub fn get_animation(
    template: &AnimationTemplate,
    context: AnimationContext,
) -> MotionResult<Animation> {
    let steps = template
        .steps
        .iter()
        .map(|step| AnimationStep::new(step.clone(), context))
        .collect::<MotionResult<Vec<_>>>()?;

    Ok(Animation::new(template.kind, template.repeat, steps))
}

impl AnimationTemplate {
    /// 部分应用：返回等待上下文的构造函数
    pub fn bind(&self) -> impl Fn(AnimationContext) -> MotionResult<Animation> + '_ {
        move |context| get_animation(self, context)
    }
}

/// 动画工厂
///
/// 持有注册表和固定的分辨率，按名称构造动画。
#[derive(Debug, Clone, Default)]
pub struct AnimationFactory {
    registry: TemplateRegistry,
    resolution: Option<Vec2>,
}

impl AnimationFactory {
    /// 创建工厂
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            resolution: None,
        }
    }

    /// 设置固定的分辨率
    pub fn with_resolution(mut self, resolution: Vec2) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// 工厂使用的注册表
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// 固定的分辨率
    pub fn resolution(&self) -> Option<Vec2> {
        self.resolution
    }

    /// 为主体构造上下文（分辨率取工厂的固定值）
    pub fn context(&self, subject: Option<Vec2>) -> AnimationContext {
        AnimationContext {
            subject,
            resolution: self.resolution,
        }
    }

    /// 按名称查找模板，返回等待主体尺寸的构造函数
    ///
    /// 名称不存在时返回 [`MotionError::TemplateNotFound`](crate::MotionError::TemplateNotFound)。
    pub fn from_name(
        &self,
        name: &str,
    ) -> MotionResult<impl Fn(Option<Vec2>) -> MotionResult<Animation> + '_> {
        let template = self.registry.get(name)?;
        Ok(move |subject| {
            let context = self.context(subject);
            get_animation(template, context)
        })
    }

    /// 按名称直接构造动画
    pub fn build(&self, name: &str, subject: Option<Vec2>) -> MotionResult<Animation> {
        let make = self.from_name(name)?;
        let animation = make(subject)?;
        debug!(
            name,
            steps = animation.step_count(),
            repeat = %animation.repeat(),
            "构造动画"
        );
        Ok(animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ContextField, MotionError};
    use crate::template::{EndResolver, Repeat, StepTemplate};

    fn registry() -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        registry
            .insert(
                "enter",
                AnimationTemplate::position(vec![
                    StepTemplate::new(
                        100.0,
                        EndResolver::default()
                            .with_resolution(Vec2::new(1.0, 0.0))
                            .with_subject(Vec2::new(1.0, 0.0)),
                    ),
                    StepTemplate::hold(200.0),
                ])
                .with_repeat(Repeat::Times(1)),
            )
            .unwrap();
        registry
            .insert(
                "nudge",
                AnimationTemplate::position(vec![StepTemplate::new(
                    10.0,
                    EndResolver::fixed(Vec2::new(0.0, 3.0)),
                )]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_get_animation_binds_context() {
        let template = AnimationTemplate::position(vec![StepTemplate::new(
            100.0,
            EndResolver::default().with_subject(Vec2::new(0.0, -1.0)),
        )]);
        let ctx = AnimationContext::new().with_subject(Vec2::new(50.0, 20.0));

        let mut anim = get_animation(&template, ctx).unwrap();
        assert_eq!(anim.step_count(), 1);
        assert_eq!(anim.steps()[0].context(), &ctx);
        assert_eq!(anim.update(100.0).delta, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn test_bind_is_reusable() {
        let template = AnimationTemplate::position(vec![StepTemplate::new(
            100.0,
            EndResolver::default().with_subject(Vec2::new(1.0, 0.0)),
        )]);
        let make = template.bind();

        let mut small = make(AnimationContext::new().with_subject(Vec2::new(10.0, 0.0))).unwrap();
        let mut large = make(AnimationContext::new().with_subject(Vec2::new(90.0, 0.0))).unwrap();

        assert_eq!(small.update(100.0).delta, Vec2::new(10.0, 0.0));
        assert_eq!(large.update(100.0).delta, Vec2::new(90.0, 0.0));
    }

    #[test]
    fn test_from_name_missing() {
        let factory = AnimationFactory::new(registry());
        match factory.from_name("nonexistent") {
            Err(MotionError::TemplateNotFound { name }) => assert_eq!(name, "nonexistent"),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected TemplateNotFound"),
        }
    }

    #[test]
    fn test_from_name_step_count() {
        let factory = AnimationFactory::new(registry()).with_resolution(Vec2::new(1280.0, 720.0));
        let make = factory.from_name("enter").unwrap();
        let anim = make(Some(Vec2::new(100.0, 30.0))).unwrap();

        assert_eq!(anim.step_count(), 2);
        assert_eq!(anim.repeat(), Repeat::Times(1));
        assert_eq!(anim.steps()[0].end_point(), Vec2::new(1380.0, 0.0));
    }

    #[test]
    fn test_build_requires_context() {
        // 未设置分辨率：enter 需要分辨率
        let factory = AnimationFactory::new(registry());
        assert_eq!(
            factory.build("enter", Some(Vec2::one())).unwrap_err(),
            MotionError::MissingContext {
                field: ContextField::Resolution
            }
        );

        // nudge 不需要任何上下文
        let mut nudge = factory.build("nudge", None).unwrap();
        assert_eq!(nudge.update(10.0).delta, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_factory_context() {
        let factory = AnimationFactory::new(registry()).with_resolution(Vec2::new(640.0, 480.0));
        let ctx = factory.context(Some(Vec2::one()));
        assert_eq!(ctx.resolution, Some(Vec2::new(640.0, 480.0)));
        assert_eq!(ctx.subject, Some(Vec2::one()));
        assert_eq!(factory.resolution(), Some(Vec2::new(640.0, 480.0)));
        assert_eq!(factory.registry().len(), 2);
    }
}
