use std::fmt;

/// 机器人错误类型
#[derive(Debug)]
pub enum BotError {
    /// 网络请求或响应解析失败
    Http(reqwest::Error),
    /// 令牌或代理文件读写失败
    Io(std::io::Error),
    /// 代理地址无法解析
    InvalidProxy(String),
    /// 服务器返回了无法处理的状态码
    UnexpectedStatus(reqwest::StatusCode),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::Http(e) => write!(f, "网络请求失败: {}", e),
            BotError::Io(e) => write!(f, "文件读写失败: {}", e),
            BotError::InvalidProxy(proxy) => write!(f, "代理地址无效: {}", proxy),
            BotError::UnexpectedStatus(status) => write!(f, "服务器返回异常状态码: {}", status),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::Http(e) => Some(e),
            BotError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        BotError::Http(e)
    }
}

impl From<std::io::Error> for BotError {
    fn from(e: std::io::Error) -> Self {
        BotError::Io(e)
    }
}
