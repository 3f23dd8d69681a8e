use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // 提前加载 .env，使得 RUST_LOG / LOG_FORMAT 等环境变量生效
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = "chirpy", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    init_logging();

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");
    let debug_mode = std::env::args().skip(1).any(|a| a == "--debug");

    // Panic 钩子：捕获异常并输出错误日志
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "chirpy",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let config = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "chirpy", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    // 构建 Tokio 运行时（线程数来自配置或 TOKIO_WORKER_THREADS）
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = config.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "chirpy", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "chirpy",
        event = "start",
        %service_id,
        pid,
        version,
        debug = debug_mode,
        threads = config.server.worker_threads.unwrap_or_default(),
        "chirpy starting"
    );

    // 在独立任务中运行服务，并监听 Ctrl+C
    rt.block_on(async move {
        let server_task = tokio::spawn(async move {
            server::run(config, debug_mode).await.inspect_err(|e| {
                error!(service = "chirpy", event = "run_failed", error = %e, "server::run returned error");
            })
        });

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "chirpy", event = "stop", %service_id, pid, "server stopped normally");
                    ExitCode::SUCCESS
                }
                // 错误已在上面记录
                Ok(Err(_)) => ExitCode::FAILURE,
                Err(e) => {
                    error!(service = "chirpy", event = "task_join_error", error = %e, "server task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "chirpy", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
