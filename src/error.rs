/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    ParseError { origin: String, message: String },
    InvalidArgument(String),
    InvalidMetadata(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError { origin, message } => {
                write!(f, "解析错误 {}: {}", origin, message)
            }
            Error::InvalidArgument(msg) => write!(f, "无效参数: {}", msg),
            Error::InvalidMetadata(msg) => write!(f, "无效元数据: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
