use std::fmt;

/// 存储引擎错误类型
#[derive(Debug)]
pub enum FsError {
    Io(std::io::Error), // 底层 I/O 错误（仅脚本读取会触发，引擎本身不做 I/O）
    AlreadyExists(String), // 同名文件已存在
    TableFull,          // 文件表已满
    InsufficientSpace { needed: usize, free: usize }, // 空闲块不足
    NotFound(String),   // 文件不存在
    OutOfBounds { offset: usize, len: usize, size: usize }, // 读写越过文件声明大小
    Exhausted,          // 动态缓冲区分配失败
}

impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io(e)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::AlreadyExists(name) => write!(f, "File '{}' already exists", name),
            Self::TableFull => write!(f, "Maximum number of files reached"),
            Self::InsufficientSpace { needed, free } => write!(
                f,
                "Not enough space: {} blocks needed, {} free",
                needed, free
            ),
            Self::NotFound(name) => write!(f, "File '{}' not found", name),
            Self::OutOfBounds { offset, len, size } => write!(
                f,
                "Access out of bounds: offset {} + {} bytes exceeds file size {}",
                offset, len, size
            ),
            Self::Exhausted => write!(f, "Memory allocation failed"),
        }
    }
}

// 支持链式错误，方便追踪底层原因
impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// 引擎统一结果类型
pub type Result<T> = std::result::Result<T, FsError>;
