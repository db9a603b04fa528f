//! # 引擎行为集成测试
//!
//! 只通过公共 API 驱动：模板 → 工厂 → 动画 → 消费者。
//! 这些测试不依赖任何文件或渲染设备。

use motion_runtime::{
    Animated, AnimationContext, AnimationFactory, AnimationKind, AnimationStep, AnimationTemplate,
    ContextField, EndResolver, Interpolation, MotionError, PlaybackState, Repeat, StepTemplate,
    TemplateRegistry, Vec2, get_animation, trace,
};

fn approx_eq(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-2 && (a.y - b.y).abs() < 1e-2
}

fn fixed_step(delay_ms: f32, duration_ms: f32, end: Vec2) -> AnimationStep {
    let template = StepTemplate::new(duration_ms, EndResolver::fixed(end)).with_delay(delay_ms);
    AnimationStep::new(template, AnimationContext::new()).unwrap()
}

/// 线性插值：fn(p, e) = e * p
#[test]
fn test_linear_interpolation() {
    let end = Vec2::new(10.0, 20.0);
    let linear = Interpolation::Linear;

    assert_eq!(linear.interpolate(0.0, end), Vec2::ZERO);
    assert_eq!(linear.interpolate(0.5, end), Vec2::new(5.0, 10.0));
    assert_eq!(linear.interpolate(1.0, end), end);
}

/// 零时长、零延迟的 step：第一次 update 交付完整终点，之后为零
#[test]
fn test_zero_duration_step_jumps_once() {
    let end = Vec2::new(3.0, -7.0);
    let mut step = fixed_step(0.0, 0.0, end);

    assert_eq!(step.update(16.0), end);
    assert!(step.is_done());
    assert_eq!(step.update(16.0), Vec2::ZERO);
    assert_eq!(step.update(1000.0), Vec2::ZERO);
}

/// 带延迟的零时长 step：一帧同时跨过延迟和结束时刻，也只交付一次完整终点
#[test]
fn test_delayed_zero_duration_step_crossed_in_one_update() {
    let end = Vec2::new(-4.0, 9.0);
    let mut step = fixed_step(100.0, 0.0, end);

    assert_eq!(step.update(250.0), end);
    assert!(step.is_done());
    assert_eq!(step.update(16.0), Vec2::ZERO);
    assert_eq!(step.update(250.0), Vec2::ZERO);
}

/// 1000ms step：500/250/500/500 的增量之和恰好是终点
#[test]
fn test_uneven_frames_sum_to_endpoint() {
    let end = Vec2::new(100.0, 40.0);
    let mut step = fixed_step(0.0, 1000.0, end);

    let mut total = Vec2::ZERO;
    for (dt, expected_done) in [(500.0, false), (250.0, false), (500.0, true), (500.0, true)] {
        let delta = step.update(dt);
        total += delta;
        assert_eq!(step.is_done(), expected_done, "dt = {dt}");
        // 不会超过尚未交付的部分
        assert!(total.x <= end.x && total.y <= end.y);
    }

    assert_eq!(total, end);
}

/// 累计时间恰好到达时长时结束
#[test]
fn test_done_exactly_at_duration() {
    let mut step = fixed_step(0.0, 1000.0, Vec2::new(1.0, 0.0));
    step.update(500.0);
    assert!(!step.is_done());
    step.update(500.0);
    assert!(step.is_done());
}

/// 延迟 1000 / 时长 4000：延迟期间无位移，之后按 4000ms 窗口计算进度
#[test]
fn test_delay_then_window() {
    let mut step = fixed_step(1000.0, 4000.0, Vec2::new(400.0, 0.0));

    assert_eq!(step.update(500.0), Vec2::ZERO);
    assert_eq!(step.update(499.0), Vec2::ZERO);
    // 恰好跨过延迟：进度仍为 0
    assert_eq!(step.update(1.0), Vec2::ZERO);
    assert_eq!(step.state(), PlaybackState::Running);

    assert_eq!(step.update(2000.0), Vec2::new(200.0, 0.0));
    assert_eq!(step.update(2000.0), Vec2::new(200.0, 0.0));
    assert!(step.is_done());
}

/// 巨大的 dt 不会越过终点
#[test]
fn test_huge_dt_clamps_to_endpoint() {
    let end = Vec2::new(-50.0, 25.0);
    let mut step = fixed_step(200.0, 300.0, end);
    assert_eq!(step.update(1.0e9), end);
    assert!(step.is_done());
}

/// 负的 dt 按 0 处理
#[test]
fn test_negative_dt_is_ignored() {
    let mut step = fixed_step(0.0, 100.0, Vec2::new(10.0, 0.0));
    assert_eq!(step.update(-50.0), Vec2::ZERO);
    assert_eq!(step.update(50.0), Vec2::new(5.0, 0.0));
}

/// 两个并行 step 各产生 (1,1) → (2,2)
#[test]
fn test_parallel_steps_sum() {
    let template = AnimationTemplate::position(vec![
        StepTemplate::new(100.0, EndResolver::fixed(Vec2::one())),
        StepTemplate::new(100.0, EndResolver::fixed(Vec2::one())),
    ]);
    let mut animation = get_animation(&template, AnimationContext::new()).unwrap();

    let update = animation.update(100.0);
    assert_eq!(update.kind, AnimationKind::Position);
    assert_eq!(update.delta, Vec2::new(2.0, 2.0));
}

/// repeat = 1：第一遍结束时不算完成，第二遍结束的那一帧完成
#[test]
fn test_repeat_once_more() {
    let step = StepTemplate::new(100.0, EndResolver::fixed(Vec2::one()));
    let template = AnimationTemplate::position(vec![step]).with_repeat(Repeat::Times(1));
    let mut animation = get_animation(&template, AnimationContext::new()).unwrap();

    assert_eq!(animation.update(100.0).delta, Vec2::one());
    assert!(!animation.is_done());
    assert_eq!(animation.iterations(), 1);

    assert_eq!(animation.update(100.0).delta, Vec2::one());
    assert!(animation.is_done());

    assert_eq!(animation.update(100.0).delta, Vec2::ZERO);
}

/// 未知名称 → TemplateNotFound；已知名称 → step 数与模板一致
#[test]
fn test_factory_lookup() {
    let factory = AnimationFactory::new(TemplateRegistry::builtin());

    let err = factory.build("no_such_animation", None).unwrap_err();
    assert_eq!(
        err,
        MotionError::TemplateNotFound {
            name: "no_such_animation".to_string()
        }
    );

    let template = factory.registry().get("shake").unwrap();
    let animation = factory.build("shake", None).unwrap();
    assert_eq!(animation.step_count(), template.steps.len());
}

/// 缺少上下文在构造时报错，而不是在播放时
#[test]
fn test_missing_context_rejected_at_construction() {
    let factory = AnimationFactory::new(TemplateRegistry::builtin())
        .with_resolution(Vec2::new(1920.0, 1080.0));

    let err = factory.build("scroll_in_left", None).unwrap_err();
    assert_eq!(
        err,
        MotionError::MissingContext {
            field: ContextField::Subject
        }
    );

    let no_resolution = AnimationFactory::new(TemplateRegistry::builtin());
    let err = no_resolution
        .build("scroll_in_left", Some(Vec2::new(10.0, 10.0)))
        .unwrap_err();
    assert_eq!(
        err,
        MotionError::MissingContext {
            field: ContextField::Resolution
        }
    );
}

/// 非有限的上下文在构造时报错，不会在播放时产生 NaN
#[test]
fn test_non_finite_context_rejected_at_construction() {
    let factory = AnimationFactory::new(TemplateRegistry::builtin())
        .with_resolution(Vec2::new(f32::INFINITY, 1080.0));
    let err = factory.build("scroll_in_left", None).unwrap_err();
    assert_eq!(
        err,
        MotionError::InvalidEndpoint {
            field: "resolution"
        }
    );

    let template = AnimationTemplate::position(vec![StepTemplate::new(
        10.0,
        EndResolver::default().with_subject(Vec2::new(1.0, 0.0)),
    )]);
    let ctx = AnimationContext::new().with_subject(Vec2::new(f32::NAN, 0.0));
    assert_eq!(
        get_animation(&template, ctx).unwrap_err(),
        MotionError::InvalidEndpoint { field: "subject" }
    );
}

/// JSON 注册表 → 工厂 → 消费者，完整跑一遍
#[test]
fn test_json_registry_end_to_end() {
    let json = r#"{
        "enter": {
            "type": "Position",
            "steps": [
                { "duration_ms": 400, "easing": "EaseOutCubic",
                  "end": { "resolution": [1, 0], "subject": [1, 0] } },
                { "delay_ms": 100, "duration_ms": 200, "end": { "offset": [0, -20] } }
            ]
        }
    }"#;
    let registry = TemplateRegistry::from_json(json).unwrap();
    let factory = AnimationFactory::new(registry).with_resolution(Vec2::new(800.0, 600.0));

    let subject = Vec2::new(200.0, 50.0);
    let animation = factory.build("enter", Some(subject)).unwrap();
    let mut label = Animated::new(Vec2::new(-200.0, 300.0), animation);

    let mut frames = 0;
    while label.update(16.0) {
        frames += 1;
        assert!(frames < 100, "动画没有结束");
    }

    assert!(approx_eq(*label.target(), Vec2::new(800.0, 280.0)));
}

/// 同一个模板绑定不同上下文得到不同终点
#[test]
fn test_template_shared_across_contexts() {
    let template = AnimationTemplate::position(vec![StepTemplate::new(
        10.0,
        EndResolver::default().with_subject(Vec2::new(-1.0, 0.0)),
    )]);
    let make = template.bind();

    let mut small = make(AnimationContext::new().with_subject(Vec2::new(10.0, 0.0))).unwrap();
    let mut large = make(AnimationContext::new().with_subject(Vec2::new(90.0, 0.0))).unwrap();

    assert_eq!(small.update(10.0).delta, Vec2::new(-10.0, 0.0));
    assert_eq!(large.update(10.0).delta, Vec2::new(-90.0, 0.0));
}

/// 固定帧模拟与逐帧手动驱动结果一致
#[test]
fn test_trace_matches_manual_loop() {
    let factory = AnimationFactory::new(TemplateRegistry::builtin());

    let mut traced = factory.build("shake", None).unwrap();
    let result = trace(&mut traced, 20.0, 1000, Vec2::ZERO);

    let mut manual = factory.build("shake", None).unwrap();
    let mut position = Vec2::ZERO;
    while !manual.is_done() {
        position += manual.update(20.0).delta;
    }

    assert!(result.finished);
    assert_eq!(result.end_position(), position);
    // shake 每遍左右抵消
    assert!(approx_eq(position, Vec2::ZERO));
}
