//! Ward服务器主程序

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use ward_admin::config::{DatabaseConfig, StorageBackend};
use ward_admin::{init_logging, ConfigManager, WardConfig};
use ward_core::{PatientRepository, PatientSeedStore, PatientService};
use ward_database::{
    DatabasePool, MemoryPatientRepository, PatientSeeder, PgPatientRepository, PoolSettings,
};
use ward_web::WebServer;

/// Ward服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "ward-server")]
#[command(about = "病区患者看板服务：HTTP 接口与示例数据工具")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别，覆盖 RUST_LOG 与配置文件
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动HTTP服务（默认）
    Serve {
        /// 监听端口，覆盖配置
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// 写入示例患者
    Seed {
        /// 生成条数，默认取配置 seeder.count
        count: Option<usize>,
        /// 随机种子，指定后生成结果可复现
        #[arg(long)]
        rng_seed: Option<u64>,
    },
    /// 清空所有患者
    Clear,
    /// 清空后重新写入示例患者
    Refresh {
        count: Option<usize>,
        #[arg(long)]
        rng_seed: Option<u64>,
    },
}

/// 已打开的存储后端
struct Storage {
    repository: Arc<dyn PatientRepository>,
    seed_store: Arc<dyn PatientSeedStore>,
    pool: Option<DatabasePool>,
}

impl Storage {
    async fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Memory => {
                info!("使用进程内存储，数据不会持久化");
                let repository = Arc::new(MemoryPatientRepository::new());
                Ok(Self {
                    repository: repository.clone(),
                    seed_store: repository,
                    pool: None,
                })
            }
            StorageBackend::Postgres => {
                let settings = PoolSettings {
                    url: config.url.clone(),
                    max_connections: config.max_connections,
                    min_connections: config.min_connections,
                    connect_timeout: config.connect_timeout(),
                };
                let pool = DatabasePool::connect(&settings)
                    .await
                    .context("Failed to connect to PostgreSQL")?;

                let repository = Arc::new(PgPatientRepository::new(&pool));
                if config.create_schema {
                    repository.create_tables().await?;
                }

                Ok(Self {
                    repository: repository.clone(),
                    seed_store: repository,
                    pool: Some(pool),
                })
            }
        }
    }

    fn is_persistent(&self) -> bool {
        self.pool.is_some()
    }

    async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let manager = ConfigManager::new(args.config.as_deref())?;

    // 初始化日志
    init_logging(&manager.get_config().logging, args.log_level.as_deref())?;

    manager.validate()?;
    let config = manager.into_config();

    let command = args.command.unwrap_or(Command::Serve { port: None });
    let storage = Storage::open(&config.database).await?;

    let result = run(command, &config, &storage).await;
    storage.close().await;
    result
}

async fn run(command: Command, config: &WardConfig, storage: &Storage) -> Result<()> {
    match command {
        Command::Serve { port } => serve(config, storage, port).await,
        Command::Seed { count, rng_seed } => {
            warn_if_ephemeral(storage);
            let mut seeder = seeder(config, storage, rng_seed);
            seeder.seed(count.unwrap_or(config.seeder.count)).await?;
            info!("Seeding completed successfully!");
            Ok(())
        }
        Command::Clear => {
            warn_if_ephemeral(storage);
            seeder(config, storage, None).clear().await?;
            Ok(())
        }
        Command::Refresh { count, rng_seed } => {
            warn_if_ephemeral(storage);
            let mut seeder = seeder(config, storage, rng_seed);
            seeder.refresh(count.unwrap_or(config.seeder.count)).await?;
            info!("Seeding completed successfully!");
            Ok(())
        }
    }
}

async fn serve(config: &WardConfig, storage: &Storage, port: Option<u16>) -> Result<()> {
    info!("启动Ward服务器...");

    if config.seeder.seed_on_startup {
        seeder(config, storage, None)
            .seed(config.seeder.count)
            .await?;
    }

    let mut addr = config.server.addr()?;
    if let Some(port) = port {
        addr.set_port(port);
    }

    info!("Ward服务器配置:");
    info!("  监听地址: {}", addr);
    info!("  存储后端: {:?}", config.database.backend);

    let service = PatientService::new(storage.repository.clone());
    WebServer::new(addr, service).run().await?;
    Ok(())
}

fn seeder(config: &WardConfig, storage: &Storage, rng_seed: Option<u64>) -> PatientSeeder {
    PatientSeeder::new(storage.seed_store.clone(), config.seeder.chunk_size, rng_seed)
}

fn warn_if_ephemeral(storage: &Storage) {
    if !storage.is_persistent() {
        warn!("memory backend selected: changes are discarded when this command exits");
    }
}
