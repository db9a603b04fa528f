//! # Error 模块
//!
//! 定义 motion-runtime 中使用的错误类型。

use thiserror::Error;

/// 上下文字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextField {
    /// 动画主体尺寸（文本/精灵大小等）
    Subject,
    /// 屏幕分辨率
    Resolution,
}

impl std::fmt::Display for ContextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// motion-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// 注册表中不存在该模板
    #[error("动画模板 '{name}' 不存在")]
    TemplateNotFound { name: String },

    /// 延迟或时长为负数/非有限值
    #[error("无效的时间参数 {field} = {value}：必须是非负有限值")]
    InvalidTiming { field: &'static str, value: f32 },

    /// 终点参数包含非有限值
    #[error("无效的终点参数 {field}：必须是有限值")]
    InvalidEndpoint { field: &'static str },

    /// 终点解析需要的上下文缺失
    #[error("终点解析需要 {field} 上下文，但构造时未提供")]
    MissingContext { field: ContextField },

    /// 模板校验失败
    #[error("模板 '{name}' 无效: {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: Box<MotionError>,
    },

    /// 注册表 JSON 解析失败
    #[error("注册表解析失败: {0}")]
    Parse(String),

    /// 注册表文件读取失败
    #[error("无法读取注册表文件 {path}: {message}")]
    Io { path: String, message: String },
}

impl MotionError {
    /// 为校验错误附加模板名
    pub fn in_template(self, name: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result 类型别名
pub type MotionResult<T> = Result<T, MotionError>;
