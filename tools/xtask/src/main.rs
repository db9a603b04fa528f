//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 motion-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `registry-check`: 检查动画注册表文件（JSON 结构、时间参数、终点参数）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use motion_runtime::{DiagnosticResult, analyze_json};
use walkdir::WalkDir;
use xshell::{Cmd, Shell, cmd};

fn run(cmd: Cmd<'_>) -> anyhow::Result<()> {
    eprintln!("\n==> {cmd}");
    cmd.run()?;
    Ok(())
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    let version = cmd!(sh, "cargo llvm-cov --version").quiet();
    match version.ignore_stdout().run() {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());
    let sh = Shell::new()?;

    match sub.as_str() {
        "check-all" => {
            run(cmd!(sh, "cargo fmt --all -- --check"))?;
            run(cmd!(sh, "cargo clippy --workspace --all-targets"))?;
            run(cmd!(sh, "cargo test --workspace"))?;
        }
        "cov-runtime" => {
            ensure_cargo_llvm_cov_available(&sh)?;

            let cov = cmd!(sh, "cargo llvm-cov -p motion-runtime --all-features --html");
            run(cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除工具 crate（xtask/motion-cli）以免稀释信号
            let excludes = ["--exclude", "xtask", "--exclude", "motion-cli"];
            run(cmd!(sh, "cargo llvm-cov --workspace {excludes...} --html"))?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "registry-check" => {
            let path = args.next();
            registry_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-runtime     运行 motion-runtime 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  registry-check  检查动画注册表文件

REGISTRY-CHECK:
  cargo xtask registry-check [path]

  不带参数：检查 assets/animations/ 下所有 .json 文件
  带路径参数：检查指定文件或目录

  检查内容：
    - JSON 结构（未知字段、类型错误）
    - 负数/非有限的 delay_ms、duration_ms
    - 非有限的终点参数
    - 空模板、每帧都完成一遍的无限循环

ALIASES (in .cargo/config.toml):
  cargo check-all       -> cargo xtask check-all
  cargo cov-runtime     -> cargo xtask cov-runtime
  cargo cov-workspace   -> cargo xtask cov-workspace
  cargo registry-check  -> cargo xtask registry-check
"#
    );
}

//=============================================================================
// registry-check 命令实现
//=============================================================================

/// 默认注册表目录（相对于 workspace root）
const DEFAULT_REGISTRY_DIR: &str = "assets/animations";

/// 执行注册表检查
fn registry_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_registry_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let dir = Path::new(DEFAULT_REGISTRY_DIR);
            if !dir.exists() {
                anyhow::bail!(
                    "默认注册表目录不存在: {}\n请在 workspace 根目录运行，或指定注册表路径",
                    dir.display()
                );
            }
            collect_registry_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到注册表文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个注册表文件...\n", files.len());

    let mut diagnostics = DiagnosticResult::new();
    let mut unreadable = 0;
    for file in &files {
        let source_id = file.display().to_string();
        match std::fs::read_to_string(file) {
            Ok(content) => diagnostics.merge(analyze_json(&source_id, &content)),
            Err(e) => {
                eprintln!("[ERROR] {}: 无法读取文件 - {}", source_id, e);
                unreadable += 1;
            }
        }
    }

    print_check_result(files.len(), unreadable, &diagnostics);

    if unreadable > 0 || diagnostics.has_errors() {
        anyhow::bail!("注册表检查发现错误");
    }

    Ok(())
}

/// 收集目录下的所有注册表文件
fn collect_registry_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 输出检查结果
fn print_check_result(checked: usize, unreadable: usize, diagnostics: &DiagnosticResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个注册表", checked);
    eprintln!();

    for diag in &diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = unreadable + diagnostics.error_count();
    let warn_count = diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
