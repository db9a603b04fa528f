//! # Config 模块
//!
//! `motion` 命令行工具的配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (motion.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use motion_runtime::Vec2;

/// 工具配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// 动画注册表路径
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// 屏幕分辨率
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// 模拟参数
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// 分辨率配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// 宽度
    #[serde(default = "default_width")]
    pub width: f32,

    /// 高度
    #[serde(default = "default_height")]
    pub height: f32,
}

/// 模拟配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 每帧时长（毫秒）
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f32,

    /// 最大帧数（无限重复的动画在此截断）
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
}

// 默认值函数
fn default_registry_path() -> PathBuf {
    PathBuf::from("assets/animations/default.json")
}

fn default_width() -> f32 {
    1920.0
}

fn default_height() -> f32 {
    1080.0
}

fn default_frame_ms() -> f32 {
    16.0
}

fn default_max_frames() -> usize {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            resolution: ResolutionConfig::default(),
            simulation: SimulationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            max_frames: default_max_frames(),
        }
    }
}

impl ResolutionConfig {
    /// 转为向量
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl MotionConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 不检查注册表文件是否存在，加载注册表时会给出更具体的错误。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ResolutionConfig { width, height } = self.resolution;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "分辨率必须是正数: {}x{}",
                width, height
            )));
        }

        let frame_ms = self.simulation.frame_ms;
        if !(frame_ms.is_finite() && frame_ms > 0.0) {
            return Err(ConfigError::ValidationFailed(format!(
                "frame_ms 必须是正数: {}",
                frame_ms
            )));
        }

        if self.simulation.max_frames == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_frames 必须大于 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationFailed(format!(
                "未知的日志级别: {}",
                self.log_level
            )));
        }

        Ok(())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
