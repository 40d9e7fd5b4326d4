use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};

use card_converter::collector::{load_json_file, write_json_file};
use card_converter::{logging, rink};

/// 将敌人/环境记录转换为 rink 格式，输出到 rink/ 目录
#[derive(Debug, Parser)]
#[command(name = "convert-to-rink", version)]
struct Args {
    /// 输入JSON文件路径
    input: PathBuf,
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.input.exists() {
        bail!("Input file '{}' not found", args.input.display());
    }

    let data = load_json_file(&args.input).context("无法解析JSON文件")?;
    let converted = rink::convert_records(&data, &args.input)?;

    let output = rink::output_path(&args.input);
    write_json_file(&output, &converted)?;
    info!(
        "Successfully converted {} items to '{}'",
        converted.len(),
        output.display()
    );
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
