use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use card_converter::logging;
use card_converter::transcode::{self, Mode};

/// 处理JSON文件、文件夹或 .dhcb 卡包，在 zzz 与 rrr 格式之间转换
#[derive(Debug, Parser)]
#[command(name = "transcode", version)]
struct Args {
    /// JSON文件、包含JSON文件的文件夹，或 .dhcb/.zip 卡包
    input: PathBuf,

    /// 输入为 zzz 格式，输出 rrr 卡包
    #[arg(long, conflicts_with = "rrr")]
    zzz: bool,

    /// 输入为 rrr 卡包，输出 zzz 记录
    #[arg(long)]
    rrr: bool,
}

impl Args {
    fn requested_mode(&self) -> Option<Mode> {
        match (self.zzz, self.rrr) {
            (true, _) => Some(Mode::Zzz),
            (_, true) => Some(Mode::Rrr),
            _ => None,
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    transcode::run(&args.input, args.requested_mode())
        .with_context(|| format!("转换失败: {}", args.input.display()))?;
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
