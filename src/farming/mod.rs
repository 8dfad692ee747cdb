use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, sleep};

use crate::accounts::{self, AccountStore};
use crate::api::models::{TokenPair, UserFarm};
use crate::api::{ApiOutcome, MinerClient};
use crate::config::{Config, RunMode};
use crate::error::BotError;

/// 按配置的运行模式启动主流程
pub async fn run(
    config: Config,
    store: AccountStore,
    accounts: Vec<TokenPair>,
    proxies: Vec<String>,
) -> Result<(), BotError> {
    match config.run_mode {
        RunMode::Sequential => run_sequential(&config, &store, accounts, &proxies).await,
        RunMode::Interval => run_interval(&config, accounts, &proxies).await,
    }
}

/// 顺序模式：无限外层循环，逐个处理账号，每轮结束后回写令牌文件
async fn run_sequential(
    config: &Config,
    store: &AccountStore,
    mut accounts: Vec<TokenPair>,
    proxies: &[String],
) -> Result<(), BotError> {
    let clients = build_clients(config, accounts.len(), proxies)?;
    let total = accounts.len();

    loop {
        for (i, tokens) in accounts.iter_mut().enumerate() {
            tracing::info!(
                "Processing account {} of {} with {}",
                i + 1,
                total,
                accounts::proxy_for(proxies, i).unwrap_or("no proxy")
            );
            *tokens =
                process_account(&clients[i], tokens.clone(), i + 1, config.retry_delay()).await;
            sleep(config.account_delay()).await;
        }

        // 令牌可能已经轮换，整体回写
        if let Err(e) = store.save(&accounts).await {
            tracing::error!("Failed to write tokens file: {}", e);
        }

        tracing::info!(
            "All accounts processed, waiting {}s before next pass...",
            config.pass_interval_secs
        );
        sleep(config.pass_interval()).await;
    }
}

/// 定时模式：每个账号先激活一次，然后按固定周期拉取并处理。
/// 同一账号的两个周期不会重叠，上一轮处理完才等待下一次 tick。
async fn run_interval(
    config: &Config,
    accounts: Vec<TokenPair>,
    proxies: &[String],
) -> Result<(), BotError> {
    let total = accounts.len();

    for (i, tokens) in accounts.into_iter().enumerate() {
        let client = MinerClient::new(&config.api_base_url, accounts::proxy_for(proxies, i))?;
        let delay = config.retry_delay();
        let period = config.cycle_interval();
        let index = i + 1;

        tracing::info!(
            "Starting account {} of {} with {}",
            index,
            total,
            accounts::proxy_for(proxies, i).unwrap_or("no proxy")
        );

        tokio::spawn(async move {
            let mut tokens = activate_farming(&client, tokens, delay).await;
            let mut ticker = interval(period);
            // interval 的第一次 tick 立即完成，先消费掉
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let (farm, refreshed) = fetch_user_farm(&client, tokens.clone(), index, delay).await;
                tokens = handle_farming(&client, &farm, refreshed, delay).await;
            }
        });

        sleep(config.account_delay()).await;
    }

    // 各账号任务长期运行，这里挂起直到进程收到退出信号
    std::future::pending().await
}

fn build_clients(
    config: &Config,
    count: usize,
    proxies: &[String],
) -> Result<Vec<MinerClient>, BotError> {
    (0..count)
        .map(|i| MinerClient::new(&config.api_base_url, accounts::proxy_for(proxies, i)))
        .collect()
}

/// 单个账号的完整处理流程，返回轮换后的令牌
async fn process_account(
    client: &MinerClient,
    tokens: TokenPair,
    index: usize,
    delay: Duration,
) -> TokenPair {
    let (farm, tokens) = fetch_user_farm(client, tokens, index, delay).await;
    let tokens = activate_farming(client, tokens, delay).await;
    handle_farming(client, &farm, tokens, delay).await
}

/// 刷新访问令牌，失败则固定间隔重试直到成功
async fn refresh_access_token(
    client: &MinerClient,
    tokens: &TokenPair,
    delay: Duration,
) -> TokenPair {
    let refreshed = retry_until(delay, "Token refresh", || client.refresh_token(tokens)).await;
    tracing::info!("Token refreshed successfully");
    refreshed
}

/// 拉取农场状态；401 时刷新令牌后重试
async fn fetch_user_farm(
    client: &MinerClient,
    mut tokens: TokenPair,
    index: usize,
    delay: Duration,
) -> (UserFarm, TokenPair) {
    loop {
        match client.get_user_farm(&tokens.access_token).await {
            Ok(ApiOutcome::Success(farm)) => {
                tracing::info!(
                    "Account {} farm status: {}, total mined: {}",
                    index,
                    farm.status,
                    farm.total_mined
                );
                return (farm, tokens);
            }
            Ok(ApiOutcome::Unauthorized) => {
                tracing::warn!("Account {} unauthorized, refreshing token...", index);
                tokens = refresh_access_token(client, &tokens, delay).await;
            }
            Err(e) => {
                tracing::info!("Account {} get farm info failed, retrying: {}", index, e);
                sleep(delay).await;
            }
        }
    }
}

/// 激活农场；401 时刷新令牌后重试，409 已在客户端折叠为成功
async fn activate_farming(
    client: &MinerClient,
    mut tokens: TokenPair,
    delay: Duration,
) -> TokenPair {
    loop {
        match client.activate(&tokens.access_token).await {
            Ok(ApiOutcome::Success(body)) => {
                tracing::info!("Farming activated: {}", body);
                return tokens;
            }
            Ok(ApiOutcome::Unauthorized) => {
                tracing::warn!("Unauthorized, refreshing token...");
                tokens = refresh_access_token(client, &tokens, delay).await;
            }
            Err(e) => {
                tracing::info!("Activation failed, retrying: {}", e);
                sleep(delay).await;
            }
        }
    }
}

/// 领取奖励；401 时刷新令牌后重试
async fn claim_rewards(client: &MinerClient, mut tokens: TokenPair, delay: Duration) -> TokenPair {
    loop {
        match client.claim(&tokens.access_token).await {
            Ok(ApiOutcome::Success(body)) => {
                tracing::info!("Farming rewards claimed: {}", body);
                return tokens;
            }
            Ok(ApiOutcome::Unauthorized) => {
                tracing::warn!("Unauthorized, refreshing token...");
                tokens = refresh_access_token(client, &tokens, delay).await;
            }
            Err(e) => {
                tracing::info!("Failed to claim farming rewards, retrying: {}", e);
                sleep(delay).await;
            }
        }
    }
}

/// 冷却结束则领取并重新激活，否则只记录下次可领取时间
async fn handle_farming(
    client: &MinerClient,
    farm: &UserFarm,
    tokens: TokenPair,
    delay: Duration,
) -> TokenPair {
    if farm.is_claimable(Utc::now()) {
        tracing::info!("Farming rewards are claimable, attempting to claim...");
        let tokens = claim_rewards(client, tokens, delay).await;
        activate_farming(client, tokens, delay).await
    } else {
        tracing::info!(
            "Farming rewards can be claimed at {}",
            farm.can_be_claimed_at
        );
        tokens
    }
}

/// 固定间隔重试，直到操作成功。无退避、无次数上限。
async fn retry_until<T, F, Fut>(delay: Duration, what: &str, mut op: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BotError>>,
{
    loop {
        match op().await {
            Ok(value) => return value,
            Err(e) => {
                tracing::info!("{} failed, retrying: {}", what, e);
                sleep(delay).await;
            }
        }
    }
}
