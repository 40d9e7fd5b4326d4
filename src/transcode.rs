use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::collector::{collect_records, is_archive, write_json_file};
use crate::error::{CardError, Result};
use crate::pack::work_zzz;
use crate::unpack::work_rrr;

/// The dialect the input is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zzz,
    Rrr,
}

impl Mode {
    pub fn opposite(self) -> Self {
        match self {
            Mode::Zzz => Mode::Rrr,
            Mode::Rrr => Mode::Zzz,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Zzz => "zzz",
            Mode::Rrr => "rrr",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Archives are always packaged (rrr) input; anything else needs an explicit mode.
pub fn resolve_mode(input: &Path, requested: Option<Mode>) -> Result<Mode> {
    if is_archive(input) {
        if requested.is_some() {
            warn!("[TRANSCODE] 输入为.dhcb文件，已固定使用rrr模式，忽略命令行模式参数");
        }
        return Ok(Mode::Rrr);
    }
    requested.ok_or(CardError::ModeRequired)
}

/// `<input without extension>_<target>.json`.
pub fn output_path(input: &Path, mode: Mode) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_{}.json", stem, mode.opposite()))
}

/// 读取输入并转换为另一种格式，结果写在输入文件旁边
pub fn run(input: &Path, requested: Option<Mode>) -> Result<PathBuf> {
    let mode = resolve_mode(input, requested)?;
    let records = collect_records(input)?;
    info!("[TRANSCODE] 模式={}，数据条数={}", mode, records.len());

    let output = output_path(input, mode);
    match mode {
        Mode::Zzz => {
            let package = work_zzz(&records, Some(input));
            info!("[TRANSCODE] 打包 {} 张卡牌", package.card_count());
            write_json_file(&output, &package)?;
        }
        Mode::Rrr => {
            let flat = work_rrr(&records);
            info!("[TRANSCODE] 展开 {} 条记录", flat.len());
            write_json_file(&output, &flat)?;
        }
    }

    info!("[TRANSCODE] 结果已保存到 {}", output.display());
    Ok(output)
}
