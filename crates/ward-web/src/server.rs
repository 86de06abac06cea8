//! Web服务器

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use ward_core::{PatientService, Result, WardError};

use crate::handlers::{
    create_patient, delete_patient, get_patient, health, list_patients, update_patient,
};

/// 处理器共享状态
#[derive(Clone, Debug)]
pub struct AppState {
    pub patients: PatientService,
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, patients: PatientService) -> Self {
        let app = Self::create_app(AppState { patients });

        Self { addr, app }
    }

    /// 构建完整路由（含中间件）
    pub fn create_app(state: AppState) -> Router {
        Router::new()
            // 健康检查
            .route("/health", get(health))
            // 患者接口
            .route("/patients", get(list_patients).post(create_patient))
            .route(
                "/patients/:id",
                get(get_patient).put(update_patient).delete(delete_patient),
            )
            .with_state(state)
            // 全局中间件
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(
                        CorsLayer::new()
                            .allow_origin(Any)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    ),
            )
    }

    /// 启动服务，收到 Ctrl+C 后优雅退出
    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| WardError::Internal(format!("Failed to bind {}: {}", self.addr, e)))?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WardError::Internal(format!("Failed to start web server: {}", e)))?;

        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        // 无法监听信号时保持运行
        Err(e) => {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
