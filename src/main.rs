use litas_bot::{
    accounts::{self, AccountStore},
    config::Config,
    farming, utils,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("{}", utils::BANNER);

    // 加载配置
    let config = Config::from_env();

    // 读取账号文件
    let store = AccountStore::new(config.tokens_file.clone());
    let accounts = match store.load().await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!("Failed to read tokens file {}: {}", config.tokens_file, e);
            std::process::exit(1);
        }
    };
    if accounts.is_empty() {
        tracing::warn!("No tokens found, exiting...");
        return;
    }
    tracing::info!(
        "Running with {} account(s) in {:?} mode",
        accounts.len(),
        config.run_mode
    );

    // 读取代理文件，缺失时直连
    let proxies = accounts::load_proxies(&config.proxy_file).await;
    if proxies.is_empty() {
        tracing::warn!("No proxy found, running without proxy...");
    }

    // 运行主流程，同时监听退出信号
    tokio::select! {
        result = farming::run(config, store, accounts, proxies) => {
            if let Err(e) = result {
                tracing::error!("Bot stopped with error: {}", e);
                std::process::exit(1);
            }
        }
        _ = shutdown_signal() => {
            tracing::warn!("Received shutdown signal, exiting...");
        }
    }
}

/// 等待 SIGINT 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
