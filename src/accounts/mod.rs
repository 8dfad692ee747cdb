use tokio::fs;

use crate::api::models::TokenPair;
use crate::error::BotError;

/// 账号令牌文件操作
///
/// 文件为行式文本，每行 `accessToken|refreshToken`。
pub struct AccountStore {
    path: String,
}

impl AccountStore {
    pub fn new(path: impl Into<String>) -> Self {
        AccountStore { path: path.into() }
    }

    /// 读取全部账号，跳过格式错误的行
    pub async fn load(&self) -> Result<Vec<TokenPair>, BotError> {
        let content = fs::read_to_string(&self.path).await?;
        Ok(parse_accounts(&content))
    }

    /// 整体重写账号文件，保存轮换后的令牌
    pub async fn save(&self, accounts: &[TokenPair]) -> Result<(), BotError> {
        fs::write(&self.path, serialize_accounts(accounts)).await?;
        Ok(())
    }
}

/// 按行解析 `accessToken|refreshToken`
pub fn parse_accounts(content: &str) -> Vec<TokenPair> {
    let mut accounts = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('|') {
            Some((access, refresh))
                if !access.trim().is_empty() && !refresh.trim().is_empty() =>
            {
                accounts.push(TokenPair {
                    access_token: access.trim().to_string(),
                    refresh_token: refresh.trim().to_string(),
                });
            }
            _ => {
                tracing::warn!("Skipping malformed line {} in tokens file", number + 1);
            }
        }
    }
    accounts
}

pub fn serialize_accounts(accounts: &[TokenPair]) -> String {
    accounts
        .iter()
        .map(|a| format!("{}|{}", a.access_token, a.refresh_token))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 读取代理列表，文件不存在时返回空列表，机器人直连运行
pub async fn load_proxies(path: &str) -> Vec<String> {
    match fs::read_to_string(path).await {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// 第 index 个账号使用的代理，代理不足时轮转复用
pub fn proxy_for(proxies: &[String], index: usize) -> Option<&str> {
    if proxies.is_empty() {
        None
    } else {
        Some(proxies[index % proxies.len()].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_lines() {
        let content = "aaa|rrr\nbbb|sss\n";
        let accounts = parse_accounts(content);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].access_token, "aaa");
        assert_eq!(accounts[0].refresh_token, "rrr");
        assert_eq!(accounts[1].access_token, "bbb");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let content = "aaa|rrr\nno-delimiter\n|missing-access\nmissing-refresh|\nbbb|sss";
        let accounts = parse_accounts(content);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].access_token, "bbb");
    }

    #[test]
    fn blank_lines_and_whitespace_are_tolerated() {
        let content = "\n  aaa | rrr  \n\n";
        let accounts = parse_accounts(content);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].access_token, "aaa");
        assert_eq!(accounts[0].refresh_token, "rrr");
    }

    #[test]
    fn empty_file_yields_no_accounts() {
        assert!(parse_accounts("").is_empty());
    }

    #[test]
    fn serialize_round_trips() {
        let accounts = vec![
            TokenPair {
                access_token: "aaa".into(),
                refresh_token: "rrr".into(),
            },
            TokenPair {
                access_token: "bbb".into(),
                refresh_token: "sss".into(),
            },
        ];
        let content = serialize_accounts(&accounts);
        assert_eq!(content, "aaa|rrr\nbbb|sss");
        assert_eq!(parse_accounts(&content), accounts);
    }

    #[test]
    fn proxy_rotation_wraps_around() {
        let proxies = vec!["http://p1:8080".to_string(), "http://p2:8080".to_string()];
        assert_eq!(proxy_for(&proxies, 0), Some("http://p1:8080"));
        assert_eq!(proxy_for(&proxies, 1), Some("http://p2:8080"));
        assert_eq!(proxy_for(&proxies, 2), Some("http://p1:8080"));
        assert_eq!(proxy_for(&[], 0), None);
    }

    #[tokio::test]
    async fn missing_proxy_file_yields_empty_list() {
        let proxies = load_proxies("definitely-missing-proxy-file.txt").await;
        assert!(proxies.is_empty());
    }

    #[tokio::test]
    async fn store_save_and_load() {
        let path = std::env::temp_dir().join(format!("litas-bot-tokens-{}.txt", std::process::id()));
        let store = AccountStore::new(path.to_string_lossy().to_string());
        let accounts = vec![TokenPair {
            access_token: "aaa".into(),
            refresh_token: "rrr".into(),
        }];
        store.save(&accounts).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, accounts);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
