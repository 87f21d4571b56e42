// ==========================================
// 气动执行器选型报价引擎 - 命令行入口
// ==========================================
// 用法:
//   actuator-select <requirements.json> [选项]
// 选项:
//   --db <path>          目录数据库(缺省: ACTUATOR_SELECTION_DB_PATH 或用户数据目录)
//   --seed <catalog.json> 选型前写入目录种子(主键已存在则跳过)
//   --migrate            选型前执行定价/备件包迁移
//   --spare-parts        结果附带备件包
//   --parallel           逐行并行选型
//   --json-log           JSON 格式日志
// 输出: stdout 打印批次结果 JSON, 日志写 stderr
// ==========================================

use actuator_selection::config::{ConfigManager, EngineConfigReader};
use actuator_selection::db::default_db_path;
use actuator_selection::engine::{BatchOptions, BatchSelector, SparePartsKitBuilder, TieredPricingCalculator};
use actuator_selection::logging;
use actuator_selection::migration::{CatalogSeeder, PricingMigration, SparePartsMigration};
use actuator_selection::repository::SqliteCatalogStore;
use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;

#[derive(Debug, Default)]
struct CliArgs {
    requirements_path: String,
    db_path: Option<String>,
    seed_path: Option<String>,
    migrate: bool,
    spare_parts: bool,
    parallel: bool,
    json_log: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut requirements_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => cli.db_path = Some(args.next().ok_or_else(|| anyhow!("--db 缺少路径"))?),
            "--seed" => {
                cli.seed_path = Some(args.next().ok_or_else(|| anyhow!("--seed 缺少路径"))?)
            }
            "--migrate" => cli.migrate = true,
            "--spare-parts" => cli.spare_parts = true,
            "--parallel" => cli.parallel = true,
            "--json-log" => cli.json_log = true,
            other if other.starts_with("--") => bail!("未知选项: {}", other),
            other => {
                if requirements_path.replace(other.to_string()).is_some() {
                    bail!("只能指定一个需求文件");
                }
            }
        }
    }

    cli.requirements_path = requirements_path
        .ok_or_else(|| anyhow!("用法: actuator-select <requirements.json> [--db <path>] [--seed <catalog.json>] [--migrate] [--spare-parts] [--parallel] [--json-log]"))?;
    Ok(cli)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args()?;
    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", actuator_selection::APP_NAME, actuator_selection::VERSION);

    let db_path = cli.db_path.clone().unwrap_or_else(default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    // ===== 配置 =====
    let config_manager =
        ConfigManager::new(&db_path).map_err(|e| anyhow!("配置管理器初始化失败: {}", e))?;
    let config = config_manager
        .load_engine_config()
        .await
        .map_err(|e| anyhow!("加载引擎配置失败: {}", e))?;

    // ===== 目录 =====
    let store = Arc::new(SqliteCatalogStore::new(&db_path).context("打开目录仓储失败")?);

    if let Some(seed_path) = &cli.seed_path {
        let report = CatalogSeeder::new(store.as_ref())
            .seed_from_json_file(seed_path)
            .with_context(|| format!("写入目录种子失败: {}", seed_path))?;
        tracing::info!(inserted = report.inserted, skipped = report.skipped, "目录种子完成");
    }

    if cli.migrate {
        let pricing = PricingMigration::new(TieredPricingCalculator::new(&config))
            .run(store.as_ref())
            .context("定价迁移失败")?;
        let spare_parts = SparePartsMigration::new(SparePartsKitBuilder::new(&config))
            .run(store.as_ref())
            .context("备件包迁移失败")?;
        eprintln!("{}", serde_json::to_string(&[pricing, spare_parts])?);
    }

    // ===== 选型 =====
    let content = std::fs::read_to_string(&cli.requirements_path)
        .with_context(|| format!("读取需求文件失败: {}", cli.requirements_path))?;
    // 只要求顶层是数组, 单行格式错误记为该行失败
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&content).context("需求文件必须是 JSON 数组")?;

    let options = BatchOptions {
        spring_range_policy: None,
        attach_spare_parts: cli.spare_parts,
    };
    let selector = Arc::new(BatchSelector::new(store, &config));
    let batch = if cli.parallel {
        selector.select_batch_values_parallel(rows, options).await
    } else {
        selector.select_batch_values(&rows, &options)
    };

    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}
