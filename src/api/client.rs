use reqwest::{Client, Proxy, StatusCode};
use serde_json::Value;

use crate::api::models::{RefreshRequest, TokenPair, UserFarm};
use crate::error::BotError;

/// 接口调用结果
#[derive(Debug)]
pub enum ApiOutcome<T> {
    /// 调用成功
    Success(T),
    /// 401，需要刷新令牌后重试
    Unauthorized,
}

/// 响应状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Ok,
    Unauthorized,
    /// 409，目标操作已经完成过
    Conflict,
    Other,
}

/// 409 只在幂等操作（激活、领取）上视为已完成
pub(crate) fn classify_status(status: StatusCode, conflict_is_done: bool) -> StatusKind {
    if status.is_success() {
        StatusKind::Ok
    } else if status == StatusCode::UNAUTHORIZED {
        StatusKind::Unauthorized
    } else if status == StatusCode::CONFLICT && conflict_is_done {
        StatusKind::Conflict
    } else {
        StatusKind::Other
    }
}

/// Litas 接口客户端，每个账号一个实例，代理在构造时绑定
pub struct MinerClient {
    http: Client,
    base_url: String,
}

impl MinerClient {
    pub fn new(base_url: &str, proxy: Option<&str>) -> Result<Self, BotError> {
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            let proxy =
                Proxy::all(proxy).map_err(|_| BotError::InvalidProxy(proxy.to_string()))?;
            builder = builder.proxy(proxy);
        }
        let http = builder.build()?;
        Ok(MinerClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 刷新访问令牌，这里的 401 无法再刷新，按普通失败处理
    pub async fn refresh_token(&self, tokens: &TokenPair) -> Result<TokenPair, BotError> {
        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .bearer_auth(&tokens.access_token)
            .json(&RefreshRequest {
                refresh_token: tokens.refresh_token.clone(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::UnexpectedStatus(status));
        }
        Ok(response.json::<TokenPair>().await?)
    }

    /// 拉取当前账号的农场状态
    pub async fn get_user_farm(&self, token: &str) -> Result<ApiOutcome<UserFarm>, BotError> {
        let response = self
            .http
            .get(format!("{}/miner/current-user", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        match classify_status(status, false) {
            StatusKind::Ok => Ok(ApiOutcome::Success(response.json::<UserFarm>().await?)),
            StatusKind::Unauthorized => Ok(ApiOutcome::Unauthorized),
            _ => Err(BotError::UnexpectedStatus(status)),
        }
    }

    /// 激活农场，409 表示已经处于激活状态
    pub async fn activate(&self, token: &str) -> Result<ApiOutcome<Value>, BotError> {
        self.patch_with_conflict("miner/activate", token, "farm already activated")
            .await
    }

    /// 领取奖励，409 表示本轮已经领取过
    pub async fn claim(&self, token: &str) -> Result<ApiOutcome<Value>, BotError> {
        self.patch_with_conflict("miner/claim", token, "farm already claimed")
            .await
    }

    async fn patch_with_conflict(
        &self,
        path: &str,
        token: &str,
        conflict_message: &str,
    ) -> Result<ApiOutcome<Value>, BotError> {
        let response = self
            .http
            .patch(format!("{}/{}", self.base_url, path))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let status = response.status();
        match classify_status(status, true) {
            StatusKind::Ok => Ok(ApiOutcome::Success(response.json::<Value>().await?)),
            StatusKind::Unauthorized => Ok(ApiOutcome::Unauthorized),
            StatusKind::Conflict => Ok(ApiOutcome::Success(Value::String(
                conflict_message.to_string(),
            ))),
            StatusKind::Other => Err(BotError::UnexpectedStatus(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_map_to_ok() {
        assert_eq!(classify_status(StatusCode::OK, false), StatusKind::Ok);
        assert_eq!(classify_status(StatusCode::CREATED, true), StatusKind::Ok);
    }

    #[test]
    fn unauthorized_maps_to_reauth() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, false),
            StatusKind::Unauthorized
        );
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, true),
            StatusKind::Unauthorized
        );
    }

    #[test]
    fn conflict_is_done_only_for_idempotent_calls() {
        assert_eq!(
            classify_status(StatusCode::CONFLICT, true),
            StatusKind::Conflict
        );
        assert_eq!(
            classify_status(StatusCode::CONFLICT, false),
            StatusKind::Other
        );
    }

    #[test]
    fn other_errors_are_retryable_failures() {
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, true),
            StatusKind::Other
        );
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, true),
            StatusKind::Other
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MinerClient::new("https://wallet.litas.io/api/v1/", None).unwrap();
        assert_eq!(client.base_url, "https://wallet.litas.io/api/v1");
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        let result = MinerClient::new("https://wallet.litas.io/api/v1", Some("not a proxy"));
        assert!(matches!(result, Err(BotError::InvalidProxy(_))));
    }
}
