//! QuickNote 服务主入口

use quicknote::{
    config::{AppConfig, StorageBackend},
    db,
    middleware::AppState,
    repository::{MemoryUserStore, NoteRepository, NoteStore, UserRepository, UserStore},
    routes, telemetry,
};
use secrecy::ExposeSecret;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("quicknote {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境），生产环境直接设置环境变量
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "QuickNote starting...");

    // 3. 选择存储后端
    let (users, notes): (Arc<dyn UserStore>, Arc<dyn NoteStore>) = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Database initialized");

            let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(pool.clone()));
            let notes: Arc<dyn NoteStore> = Arc::new(NoteRepository::new(pool));
            (users, notes)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            let store = MemoryUserStore::new();
            let notes: Arc<dyn NoteStore> = Arc::new(store.note_store());
            let users: Arc<dyn UserStore> = Arc::new(store);
            (users, notes)
        }
    };

    // 4. 构建应用状态
    let app_state = Arc::new(AppState::new(config.clone(), users, notes)?);

    // 5. 初始管理员
    if let (Some(username), Some(password)) = (
        config.bootstrap.admin_username.as_deref(),
        config.bootstrap.admin_password.as_ref(),
    ) {
        app_state
            .user_service
            .ensure_admin(username, password.expose_secret())
            .await?;
    }

    // 6. 构建路由
    let app = routes::create_router(app_state);

    // 7. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 8. 优雅关闭
    let timeout_secs = config.server.graceful_shutdown_timeout_secs;
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = drain_tx.send(());
    })
    .into_future();

    // 收到信号后最多等待 timeout_secs 让在途请求完成
    tokio::select! {
        result = server => result?,
        _ = async {
            let _ = drain_rx.await;
            tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        } => {
            tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }
}

/// 打印帮助信息
fn print_help() {
    println!("quicknote {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: quicknote [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 QUICKNOTE_ 前缀的环境变量完成（例如 QUICKNOTE_SECURITY__JWT_SECRET）");
    println!("  可用选项请参考 .env.example");
}
