use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, converting or writing card files.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("输入路径不存在: {}", .0.display())]
    MissingPath(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析 JSON 文件 {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} 的根元素既不是字典也不是列表", .0.display())]
    InvalidRoot(PathBuf),

    #[error("{} 的根元素不是列表（实际类型: {kind}）", path.display())]
    NotAList { path: PathBuf, kind: &'static str },

    #[error("不支持的文件扩展名: {}，仅支持 .json, .dhcb, .zip", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("文件不是有效的ZIP压缩包 {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("ZIP文件中未找到cards.json或任何JSON文件: {}", .0.display())]
    NoManifest(PathBuf),

    #[error("记录 `{name}` 格式错误: {reason}")]
    MalformedRecord { name: String, reason: String },

    #[error("必须指定 --zzz 或 --rrr 参数（.dhcb文件除外）")]
    ModeRequired,
}

impl CardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CardError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CardError::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CardError::MalformedRecord {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
