use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};

use card_converter::collector::{load_json_file, write_json_file};
use card_converter::{keyword, logging};

/// 读取JSON文件，生成关键词列表，并保存为 _keyword.json 文件
#[derive(Debug, Parser)]
#[command(name = "extract-keywords", version)]
struct Args {
    /// 输入JSON文件路径
    input: PathBuf,
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.input.is_file() {
        bail!("文件不存在: {}", args.input.display());
    }

    let data = load_json_file(&args.input).context("无法解析JSON文件")?;
    let entries = keyword::work(&data);

    let output = keyword::output_path(&args.input);
    write_json_file(&output, &entries)?;
    info!("结果已保存到 {}", output.display());
    info!("共生成 {} 条记录", entries.len());
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
