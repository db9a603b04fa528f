//! # Motion CLI
//!
//! 无界面的动画调试工具：列出注册表中的模板、按固定帧时长模拟动画、检查注册表。
//!
//! ## 用法
//!
//! ```bash
//! # 在项目根目录使用 cargo 运行
//! cargo run -p motion-cli -- list
//! cargo run -p motion-cli -- simulate scroll_in_left --subject 240 32
//! cargo run -p motion-cli -- simulate bob --frame-ms 33 --max-frames 120 --json
//! cargo run -p motion-cli -- check
//! cargo run -p motion-cli -- export assets/animations/default.json
//!
//! # 或安装后直接使用
//! cargo install --path tools/motion-cli
//! motion -v simulate shake
//! ```

mod config;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info};

use config::MotionConfig;
use motion_runtime::{
    AnimationFactory, DiagnosticLevel, TemplateRegistry, Trace, Vec2, analyze_json, trace,
};

#[derive(Parser)]
#[command(name = "motion")]
#[command(about = "动画调试工具 - 列出、模拟、检查动画模板")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径（默认：motion.json）
    #[arg(short, long, default_value = "motion.json", global = true)]
    config: PathBuf,

    /// 使用内置注册表，忽略配置中的 registry_path
    #[arg(long, global = true)]
    builtin: bool,

    /// 输出更详细的日志（-v: debug，-vv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出注册表中的模板
    List,

    /// 以固定帧时长模拟动画并输出每帧轨迹
    Simulate {
        /// 模板名称
        name: String,

        /// 主体尺寸（宽 高）
        #[arg(long, num_args = 2, value_names = ["W", "H"])]
        subject: Option<Vec<f32>>,

        /// 起始位置（x y），默认原点
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        start: Option<Vec<f32>>,

        /// 每帧时长（毫秒），覆盖配置
        #[arg(long)]
        frame_ms: Option<f32>,

        /// 最大帧数，覆盖配置
        #[arg(long)]
        max_frames: Option<usize>,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 静态检查注册表文件
    Check,

    /// 导出注册表为 JSON
    Export {
        /// 输出文件（默认输出到标准输出）
        output: Option<PathBuf>,
    },

    /// 生成默认配置文件
    InitConfig {
        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 配置决定日志级别，加载配置期间先用 warn 级别的临时订阅者
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || MotionConfig::load(&cli.config));

    tracing_subscriber::fmt()
        .with_ansi(true)
        .with_max_level(log_level(cli.verbose, &config.log_level))
        .init();

    config
        .validate()
        .with_context(|| format!("配置无效: {}", cli.config.display()))?;
    debug!(?config, "配置");

    match cli.command {
        Commands::List => list(&load_registry(&config, cli.builtin)?),
        Commands::Simulate {
            name,
            subject,
            start,
            frame_ms,
            max_frames,
            json,
        } => {
            let registry = load_registry(&config, cli.builtin)?;
            let factory =
                AnimationFactory::new(registry).with_resolution(config.resolution.to_vec2());
            let options = SimulateOptions {
                subject: subject.as_deref().map(pair),
                start: start.as_deref().map(pair).unwrap_or_default(),
                frame_ms: frame_ms.unwrap_or(config.simulation.frame_ms),
                max_frames: max_frames.unwrap_or(config.simulation.max_frames),
                json,
            };
            simulate(&factory, &name, &options)
        }
        Commands::Check => check(&config.registry_path),
        Commands::Export { output } => export(&load_registry(&config, cli.builtin)?, output),
        Commands::InitConfig { force } => init_config(&cli.config, force),
    }
}

/// 命令行 `-v` 优先，其次配置文件
fn log_level(verbose: u8, configured: &str) -> Level {
    match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// clap 保证 `num_args = 2`
fn pair(values: &[f32]) -> Vec2 {
    match values {
        [x, y] => Vec2::new(*x, *y),
        _ => Vec2::ZERO,
    }
}

fn load_registry(config: &MotionConfig, builtin: bool) -> Result<TemplateRegistry> {
    if builtin {
        debug!("使用内置注册表");
        return Ok(TemplateRegistry::builtin());
    }

    let registry = TemplateRegistry::load(&config.registry_path)
        .with_context(|| format!("加载注册表失败: {}", config.registry_path.display()))?;
    info!(
        path = %config.registry_path.display(),
        templates = registry.len(),
        "注册表加载完成"
    );
    Ok(registry)
}

/// 列出模板
fn list(registry: &TemplateRegistry) -> Result<()> {
    if registry.is_empty() {
        println!("注册表为空");
        return Ok(());
    }

    println!(
        "{:<24} {:>5} {:>9} {:>10}  {}",
        "名称", "step", "重复", "单遍(ms)", "上下文"
    );
    for (name, template) in registry.iter() {
        let mut needs = Vec::new();
        if template.needs_subject() {
            needs.push("subject");
        }
        if template.needs_resolution() {
            needs.push("resolution");
        }
        println!(
            "{:<24} {:>5} {:>9} {:>10.1}  {}",
            name,
            template.steps.len(),
            template.repeat.to_string(),
            template.pass_ms(),
            if needs.is_empty() {
                "-".to_string()
            } else {
                needs.join(", ")
            }
        );
    }

    println!("\n共 {} 个模板", registry.len());
    Ok(())
}

struct SimulateOptions {
    subject: Option<Vec2>,
    start: Vec2,
    frame_ms: f32,
    max_frames: usize,
    json: bool,
}

/// 模拟动画
fn simulate(factory: &AnimationFactory, name: &str, options: &SimulateOptions) -> Result<()> {
    if !(options.frame_ms.is_finite() && options.frame_ms > 0.0) {
        bail!("--frame-ms 必须是正数: {}", options.frame_ms);
    }

    let mut animation = factory
        .build(name, options.subject)
        .with_context(|| format!("无法构造动画 '{}'", name))?;
    let result = trace(
        &mut animation,
        options.frame_ms,
        options.max_frames,
        options.start,
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_trace(name, &result);
    }

    Ok(())
}

fn print_trace(name: &str, result: &Trace) {
    println!("▶ {}", name);
    println!("{:>6} {:>10}  {:<24} {}", "帧", "时间(ms)", "增量", "位置");
    for sample in &result.frames {
        println!(
            "{:>6} {:>10.1}  {:<24} {}",
            sample.frame,
            sample.elapsed_ms,
            sample.delta.to_string(),
            sample.position
        );
    }

    println!();
    println!("起点: {}", result.start);
    println!("终点: {}", result.end_position());
    println!("总位移: {}", result.total_delta());
    if result.finished {
        let frames = result.frames.len();
        println!("✅ {frames} 帧内结束，用时 {:.1}ms", result.elapsed_ms());
    } else {
        println!("⏸ 达到帧数上限 {} 仍未结束", result.frames.len());
    }
}

/// 检查注册表
fn check(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取注册表文件: {}", path.display()))?;
    let result = analyze_json(&path.display().to_string(), &content);

    for diag in result.filter_by_level(DiagnosticLevel::Info) {
        println!("{}", diag);
    }

    println!(
        "\n{} 个错误，{} 个警告",
        result.error_count(),
        result.warn_count()
    );
    if result.has_errors() {
        bail!("注册表检查失败: {}", path.display());
    }
    Ok(())
}

/// 导出注册表
fn export(registry: &TemplateRegistry, output: Option<PathBuf>) -> Result<()> {
    let json = registry.to_json_pretty()?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("写入失败: {}", path.display()))?;
            info!(path = %path.display(), templates = registry.len(), "注册表已导出");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// 写出默认配置
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    MotionConfig::default().save(path)?;
    info!(path = %path.display(), "已生成默认配置");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_priority() {
        assert_eq!(log_level(0, "warn"), Level::WARN);
        assert_eq!(log_level(0, "garbage"), Level::INFO);
        assert_eq!(log_level(1, "warn"), Level::DEBUG);
        assert_eq!(log_level(3, "error"), Level::TRACE);
    }

    #[test]
    fn test_cli_parses_simulate() {
        let args = "motion -vv simulate scroll_in_left --subject 240 32 --start -240 500 --json";
        let cli = Cli::try_parse_from(args.split_whitespace()).unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Simulate {
                name,
                subject,
                start,
                json,
                ..
            } => {
                assert_eq!(name, "scroll_in_left");
                assert_eq!(subject.as_deref().map(pair), Some(Vec2::new(240.0, 32.0)));
                assert_eq!(start.as_deref().map(pair), Some(Vec2::new(-240.0, 500.0)));
                assert!(json);
            }
            _ => panic!("应解析为 simulate"),
        }
    }

    #[test]
    fn test_export_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anims").join("builtin.json");

        export(&TemplateRegistry::builtin(), Some(path.clone())).unwrap();
        check(&path).unwrap();

        let loaded = TemplateRegistry::load(&path).unwrap();
        assert_eq!(loaded, TemplateRegistry::builtin());
    }

    #[test]
    fn test_check_fails_on_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let json = r#"{ "bad": { "steps": [ { "duration_ms": -5 } ] } }"#;
        std::fs::write(&path, json).unwrap();

        assert!(check(&path).is_err());
    }

    #[test]
    fn test_simulate_unknown_name() {
        let factory = AnimationFactory::new(TemplateRegistry::builtin());
        let options = SimulateOptions {
            subject: None,
            start: Vec2::ZERO,
            frame_ms: 16.0,
            max_frames: 10,
            json: true,
        };
        assert!(simulate(&factory, "missing", &options).is_err());
        assert!(simulate(&factory, "shake", &options).is_ok());
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion.json");

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
        assert_eq!(MotionConfig::load(&path), MotionConfig::default());
    }
}
