use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 访问令牌与刷新令牌对，对应令牌文件中的一行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 刷新令牌请求体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 农场状态，每轮重新拉取，不做持久化
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFarm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_mined: f64,
    pub can_be_claimed_at: DateTime<Utc>,
}

impl UserFarm {
    /// 冷却时间已过即可领取
    pub fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        self.can_be_claimed_at <= now
    }
}
