// ==========================================
// 目录迁移集成测试
// ==========================================
// 测试目标: 种子/定价/备件包迁移可重复执行, 迁移后记录可被选型
// ==========================================

mod helpers;

use actuator_selection::config::EngineConfig;
use actuator_selection::domain::actuator::{ActuatorModel, CatalogKey};
use actuator_selection::domain::selection::SelectionRequirement;
use actuator_selection::domain::types::{PricingModel, Series};
use actuator_selection::engine::{
    BatchOptions, BatchSelector, SparePartsKitBuilder, TieredPricingCalculator,
};
use actuator_selection::migration::{CatalogSeeder, PricingMigration, SparePartsMigration};
use actuator_selection::repository::{CatalogStore, SqliteCatalogStore};
use helpers::catalog_builder::CatalogRecordBuilder;
use helpers::create_test_db;
use std::io::Write;
use std::sync::Arc;

fn legacy_catalog() -> Vec<actuator_selection::domain::actuator::CatalogRecord> {
    vec![
        CatalogRecordBuilder::new("AT063", Series::At)
            .curve(&[(6.0, 120.0)])
            .legacy_price(Some(680.0), None)
            .build(),
        CatalogRecordBuilder::new("GY52", Series::Gy)
            .curve(&[(6.0, 7500.0)])
            .legacy_price(Some(12000.0), Some(15000.0))
            .build(),
        CatalogRecordBuilder::new("GY62", Series::Gy)
            .curve(&[(6.0, 11000.0)])
            .legacy_price(None, Some(21000.0))
            .build(),
    ]
}

fn open_store() -> (tempfile::NamedTempFile, SqliteCatalogStore) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = SqliteCatalogStore::new(&db_path).expect("Failed to open store");
    (temp_file, store)
}

#[test]
fn test_pricing_migration_idempotent() {
    let (_temp_file, store) = open_store();
    CatalogSeeder::new(&store).seed(legacy_catalog()).unwrap();
    let migration = PricingMigration::new(TieredPricingCalculator::new(&EngineConfig::default()));

    let first = migration.run(&store).unwrap();
    assert_eq!(first.scanned, 3);
    assert_eq!(first.migrated, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.failed(), 1);
    assert_eq!(first.failures[0].key, "GY/GY62");

    let second = migration.run(&store).unwrap();
    assert_eq!(second.migrated, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.failed(), 1);

    let gy52 = store.get(&CatalogKey::new("GY52", Some(Series::Gy), None)).unwrap().unwrap();
    assert_eq!(gy52.pricing_model, Some(PricingModel::Tiered));
    assert_eq!(gy52.base_price, Some(12000.0));
    assert_eq!(gy52.price_tiers.as_ref().map(|t| t.len()), Some(4));
    assert!(ActuatorModel::try_from(&gy52).is_ok());

    let at063 = store.get(&CatalogKey::new("AT063", Some(Series::At), None)).unwrap().unwrap();
    assert_eq!(at063.pricing_model, Some(PricingModel::Fixed));
    assert!(at063.price_tiers.is_none());
}

#[test]
fn test_spare_parts_migration_idempotent() {
    let (_temp_file, store) = open_store();
    CatalogSeeder::new(&store).seed(legacy_catalog()).unwrap();
    let migration = SparePartsMigration::new(SparePartsKitBuilder::new(&EngineConfig::default()));

    let first = migration.run(&store).unwrap();
    assert_eq!(first.migrated, 3);
    let second = migration.run(&store).unwrap();
    assert_eq!(second.migrated, 0);
    assert_eq!(second.skipped, 3);

    let gy52 = store.get(&CatalogKey::new("GY52", Some(Series::Gy), None)).unwrap().unwrap();
    let kit = gy52.spare_parts.unwrap();
    assert!(kit.find_part("GY-YB-GY52").is_some());
}

#[test]
fn test_migrated_catalog_is_selectable_with_stored_kit() {
    let (_temp_file, store) = open_store();
    CatalogSeeder::new(&store).seed(legacy_catalog()).unwrap();
    let config = EngineConfig::default();
    PricingMigration::new(TieredPricingCalculator::new(&config))
        .run(&store)
        .unwrap();
    SparePartsMigration::new(SparePartsKitBuilder::new(&config))
        .run(&store)
        .unwrap();

    // GY62 无法迁移, 仍会被匹配器拒绝; 用 AT 系列限定避开
    let row = SelectionRequirement::new("PV-1", "ball", 90.0, 6.0, 1.25, 2).with_series(Series::At);
    let options = BatchOptions {
        attach_spare_parts: true,
        ..Default::default()
    };
    let batch = BatchSelector::new(Arc::new(store), &config).select_batch(&[row], &options);
    let result = &batch.results[0];
    assert_eq!(result.model_code, "AT063");
    assert_eq!(result.unit_price, 680.0);
    assert_eq!(result.total_price, 1360.0);
    assert!(result.spare_parts.is_some());
}

#[test]
fn test_seed_from_json_file() {
    let (_temp_file, store) = open_store();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&legacy_catalog()).unwrap()).unwrap();

    let seeder = CatalogSeeder::new(&store);
    let first = seeder.seed_from_json_file(file.path()).unwrap();
    assert_eq!(first.inserted, 3);
    let second = seeder.seed_from_json_file(file.path()).unwrap();
    assert_eq!(second.skipped, 3);
}
