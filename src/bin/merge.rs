use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use card_converter::{logging, merger};

/// 合并指定路径下所有 *_zzz.json 文件中的列表
#[derive(Debug, Parser)]
#[command(name = "merge", version)]
struct Args {
    /// 包含 *_zzz.json 文件的目录路径（递归搜索）
    path: PathBuf,
}

fn run(args: Args) -> anyhow::Result<()> {
    merger::merge_directory(&args.path)
        .with_context(|| format!("合并失败: {}", args.path.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
