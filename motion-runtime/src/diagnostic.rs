//! # 诊断模块
//!
//! 对注册表做静态检查，不依赖 IO。
//!
//! ## 设计原则
//!
//! - 纯函数 API，输入是已解析但尚未校验的模板
//! - 诊断分级：Error（加载会失败）、Warn（能运行但很可能不是作者本意）、Info（信息提示）
//! - 与 [`TemplateRegistry`](crate::TemplateRegistry) 的加载校验共用同一套规则

use std::collections::BTreeMap;

use crate::error::MotionError;
use crate::template::{AnimationTemplate, StepTemplate};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 注册表来源（文件路径等）
    pub source_id: String,
    /// 模板名
    pub template: Option<String>,
    /// step 序号（从 0 开始）
    pub step: Option<usize>,
    /// 诊断消息
    pub message: String,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, source_id: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            source_id: source_id.to_string(),
            template: None,
            step: None,
            message: message.into(),
        }
    }

    /// 创建错误诊断
    pub fn error(source_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, source_id, message)
    }

    /// 创建警告诊断
    pub fn warn(source_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, source_id, message)
    }

    /// 创建信息诊断
    pub fn info(source_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, source_id, message)
    }

    /// 设置模板名
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    /// 设置 step 序号
    pub fn with_step(mut self, index: usize) -> Self {
        self.step = Some(index);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.source_id)?;
        if let Some(template) = &self.template {
            write!(f, " :: {}", template)?;
        }
        if let Some(step) = self.step {
            write!(f, "#{}", step)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    /// 获取警告数量
    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 解析 JSON 注册表并分析
///
/// JSON 本身无法解析时返回一条错误诊断。
pub fn analyze_json(source_id: &str, json: &str) -> DiagnosticResult {
    match serde_json::from_str::<BTreeMap<String, AnimationTemplate>>(json) {
        Ok(templates) => analyze_registry(source_id, &templates),
        Err(e) => {
            let mut result = DiagnosticResult::new();
            result.push(Diagnostic::error(source_id, format!("JSON 解析失败: {e}")));
            result
        }
    }
}

/// 分析注册表，返回诊断结果
///
/// 执行以下检查：
/// - 负数/非有限的延迟与时长、非有限的终点参数（Error）
/// - 没有任何 step 的模板（Warn）
/// - 无限重复且每个 step 都是瞬时的模板：每帧都完成一遍（Warn）
/// - 需要主体尺寸上下文的模板（Info）
pub fn analyze_registry(
    source_id: &str,
    templates: &BTreeMap<String, AnimationTemplate>,
) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for (name, template) in templates {
        analyze_template(source_id, name, template, &mut result);
    }

    result
}

fn analyze_template(
    source_id: &str,
    name: &str,
    template: &AnimationTemplate,
    result: &mut DiagnosticResult,
) {
    if template.steps.is_empty() {
        result.push(
            Diagnostic::warn(source_id, "模板没有任何 step，第一帧即结束").with_template(name),
        );
    }

    for (index, step) in template.steps.iter().enumerate() {
        if let Err(e) = step.validate() {
            result.push(
                Diagnostic::error(source_id, describe(&e))
                    .with_template(name)
                    .with_step(index),
            );
        }
    }

    let instantaneous = |s: &StepTemplate| s.total_ms() <= 0.0;
    if template.repeat.is_infinite()
        && !template.steps.is_empty()
        && template.steps.iter().all(instantaneous)
    {
        let message = "无限重复的模板每个 step 都是瞬时的，每帧都会完成一遍";
        result.push(Diagnostic::warn(source_id, message).with_template(name));
    }

    if template.needs_subject() {
        result.push(
            Diagnostic::info(source_id, "终点依赖主体尺寸，构造时必须提供 subject")
                .with_template(name),
        );
    }
}

fn describe(error: &MotionError) -> String {
    match error {
        MotionError::InvalidTemplate { source, .. } => describe(source),
        other => other.to_string(),
    }
}
