use std::env;
use std::time::Duration;

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// 单循环顺序处理所有账号，每轮之间长休眠，并回写令牌文件
    Sequential,
    /// 每个账号一个独立定时任务，不回写文件
    Interval,
}

impl RunMode {
    /// 未知取值一律回退到顺序模式
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "interval" => RunMode::Interval,
            _ => RunMode::Sequential,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub tokens_file: String,
    pub proxy_file: String,
    pub retry_delay_secs: u64,
    pub account_delay_secs: u64,
    pub pass_interval_secs: u64,
    pub cycle_interval_secs: u64,
    pub run_mode: RunMode,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Config {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "https://wallet.litas.io/api/v1".into()),
            tokens_file: env::var("TOKENS_FILE").unwrap_or_else(|_| "tokens.txt".into()),
            proxy_file: env::var("PROXY_FILE").unwrap_or_else(|_| "proxy.txt".into()),
            retry_delay_secs: env_u64("RETRY_DELAY_SECS", 3),
            account_delay_secs: env_u64("ACCOUNT_DELAY_SECS", 3),
            pass_interval_secs: env_u64("PASS_INTERVAL_SECS", 3600),
            cycle_interval_secs: env_u64("CYCLE_INTERVAL_SECS", 60),
            run_mode: RunMode::parse(&env::var("RUN_MODE").unwrap_or_default()),
        }
    }

    /// 重试之间的固定等待
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// 同一轮内相邻账号之间的等待
    pub fn account_delay(&self) -> Duration {
        Duration::from_secs(self.account_delay_secs)
    }

    /// 顺序模式两轮之间的等待
    pub fn pass_interval(&self) -> Duration {
        Duration::from_secs(self.pass_interval_secs)
    }

    /// 定时模式单个账号的处理周期
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_mode_parse() {
        assert_eq!(RunMode::parse("interval"), RunMode::Interval);
        assert_eq!(RunMode::parse(" INTERVAL "), RunMode::Interval);
        assert_eq!(RunMode::parse("sequential"), RunMode::Sequential);
        assert_eq!(RunMode::parse(""), RunMode::Sequential);
        assert_eq!(RunMode::parse("whatever"), RunMode::Sequential);
    }

    #[test]
    fn env_u64_falls_back_when_unset() {
        assert_eq!(env_u64("LITAS_BOT_TEST_KEY_THAT_DOES_NOT_EXIST", 42), 42);
    }

    #[test]
    fn duration_accessors() {
        let config = Config {
            api_base_url: "https://wallet.litas.io/api/v1".into(),
            tokens_file: "tokens.txt".into(),
            proxy_file: "proxy.txt".into(),
            retry_delay_secs: 3,
            account_delay_secs: 3,
            pass_interval_secs: 3600,
            cycle_interval_secs: 60,
            run_mode: RunMode::Sequential,
        };
        assert_eq!(config.retry_delay(), Duration::from_secs(3));
        assert_eq!(config.pass_interval(), Duration::from_secs(3600));
        assert_eq!(config.cycle_interval(), Duration::from_secs(60));
    }
}
