//! Integration tests for WarehouseService against an in-memory SQLite
//! database with the real schema applied.

use bodega_api::{
    db::{connect, run_migrations, DbPool},
    entities::{manager, warehouse, warehouse_manager},
    errors::ServiceError,
    services::warehouses::{NewWarehouse, StatusFilter, WarehouseService, WarehouseUpdate},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use std::sync::Arc;
use std::time::Duration;

async fn setup() -> (Arc<DbPool>, WarehouseService) {
    let db = Arc::new(connect("sqlite::memory:").await.expect("connect"));
    run_migrations(&db).await.expect("migrations");
    let service = WarehouseService::new(db.clone());
    (db, service)
}

async fn seed_manager(
    db: &DbPool,
    id: i32,
    rut_number: i32,
    rut_check_digit: &str,
    first_name: &str,
    last_name_paternal: &str,
    last_name_maternal: Option<&str>,
) {
    manager::ActiveModel {
        id: Set(id),
        rut_number: Set(rut_number),
        rut_check_digit: Set(rut_check_digit.to_string()),
        first_name: Set(first_name.to_string()),
        last_name_paternal: Set(last_name_paternal.to_string()),
        last_name_maternal: Set(last_name_maternal.map(str::to_string)),
    }
    .insert(db)
    .await
    .expect("seed manager");
}

async fn seed_default_managers(db: &DbPool) {
    seed_manager(db, 1, 12345678, "9", "Juan", "Pérez", Some("Soto")).await;
    seed_manager(db, 2, 23456789, "K", "María", "Díaz", None).await;
    seed_manager(db, 3, 34567890, "1", "Pedro", "Alarcón", Some("Rojas")).await;
}

fn sample_warehouse(code: &str) -> NewWarehouse {
    NewWarehouse {
        code: code.to_string(),
        name: "Bodega Central".to_string(),
        address: "Av. Siempre Viva 742".to_string(),
        staff_count: 150,
        active: true,
    }
}

#[tokio::test]
async fn create_then_get_round_trip() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let id = service
        .create(
            NewWarehouse {
                code: " bod1 ".to_string(),
                name: "  Bodega Central ".to_string(),
                address: " Av. Siempre Viva 742 ".to_string(),
                staff_count: 150,
                active: true,
            },
            vec![2, 1],
        )
        .await
        .expect("create");

    let detail = service
        .get_by_id(id)
        .await
        .expect("get")
        .expect("warehouse exists");

    assert_eq!(detail.warehouse.code, "BOD1");
    assert_eq!(detail.warehouse.name, "Bodega Central");
    assert_eq!(detail.warehouse.address, "Av. Siempre Viva 742");
    assert_eq!(detail.warehouse.staff_count, 150);
    assert!(detail.warehouse.active);

    let mut ids = detail.manager_ids.clone();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn get_by_id_misses_cleanly() {
    let (_db, service) = setup().await;
    assert!(service.get_by_id(999).await.expect("get").is_none());
}

#[tokio::test]
async fn duplicate_code_is_rejected_with_no_partial_writes() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    service
        .create(sample_warehouse("BOD1"), vec![1])
        .await
        .expect("first create");

    // The unique index is the authoritative guard: even skipping the
    // code_exists pre-check, the second insert must fail atomically.
    let err = service
        .create(sample_warehouse("bod1"), vec![1, 2])
        .await
        .expect_err("duplicate code must fail");
    assert!(matches!(err, ServiceError::DuplicateCode(_)), "{err:?}");

    let warehouses = warehouse::Entity::find().count(&*db).await.unwrap();
    assert_eq!(warehouses, 1);
    let assignments = warehouse_manager::Entity::find().count(&*db).await.unwrap();
    assert_eq!(assignments, 1);
}

#[tokio::test]
async fn empty_manager_set_is_rejected_before_any_write() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let err = service
        .create(sample_warehouse("BOD1"), vec![])
        .await
        .expect_err("empty manager set must fail");
    assert!(matches!(err, ServiceError::EmptyManagerSet));
    assert_eq!(warehouse::Entity::find().count(&*db).await.unwrap(), 0);

    let id = service
        .create(sample_warehouse("BOD2"), vec![1])
        .await
        .unwrap();
    let err = service
        .edit(
            id,
            WarehouseUpdate {
                name: "Otro Nombre".to_string(),
                address: "Otra Dirección".to_string(),
                staff_count: 5,
                active: false,
            },
            vec![],
        )
        .await
        .expect_err("empty manager set must fail on edit too");
    assert!(matches!(err, ServiceError::EmptyManagerSet));

    // Nothing was touched
    let detail = service.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(detail.warehouse.name, "Bodega Central");
    assert_eq!(detail.manager_ids, vec![1]);
}

#[tokio::test]
async fn edit_replaces_the_manager_set_and_keeps_code() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let id = service
        .create(sample_warehouse("BOD1"), vec![1, 2])
        .await
        .unwrap();
    let before = service.get_by_id(id).await.unwrap().unwrap();

    service
        .edit(
            id,
            WarehouseUpdate {
                name: "Bodega Sur".to_string(),
                address: "Camino Nuevo 12".to_string(),
                staff_count: 20,
                active: false,
            },
            vec![3],
        )
        .await
        .expect("edit");

    let after = service.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.warehouse.name, "Bodega Sur");
    assert_eq!(after.warehouse.address, "Camino Nuevo 12");
    assert_eq!(after.warehouse.staff_count, 20);
    assert!(!after.warehouse.active);
    // Replace, not merge: no residue of {1, 2}
    assert_eq!(after.manager_ids, vec![3]);
    // code and created_at are immutable
    assert_eq!(after.warehouse.code, "BOD1");
    assert_eq!(after.warehouse.created_at, before.warehouse.created_at);
}

#[tokio::test]
async fn delete_removes_warehouse_and_assignments() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let id = service
        .create(sample_warehouse("BOD1"), vec![1, 2])
        .await
        .unwrap();

    service.delete(id).await.expect("delete");

    assert_eq!(warehouse::Entity::find().count(&*db).await.unwrap(), 0);
    let orphans = warehouse_manager::Entity::find()
        .filter(warehouse_manager::Column::WarehouseId.eq(id))
        .count(&*db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn delete_of_a_missing_id_is_not_found_and_changes_nothing() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;
    service
        .create(sample_warehouse("BOD1"), vec![1])
        .await
        .unwrap();

    let err = service.delete(999).await.expect_err("missing id");
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(warehouse::Entity::find().count(&*db).await.unwrap(), 1);
    assert_eq!(
        warehouse_manager::Entity::find().count(&*db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn list_filters_by_status_and_orders_newest_first() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let mut first = sample_warehouse("BOD1");
    first.active = true;
    let mut second = sample_warehouse("BOD2");
    second.active = false;
    let mut third = sample_warehouse("BOD3");
    third.active = true;

    let id1 = service.create(first, vec![1]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let id2 = service.create(second, vec![1]).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let id3 = service.create(third, vec![1]).await.unwrap();

    let all = service.list(StatusFilter::All).await.unwrap();
    assert_eq!(
        all.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![id3, id2, id1],
        "newest first"
    );

    let active = service.list(StatusFilter::Active).await.unwrap();
    assert!(active.iter().all(|w| w.active));
    assert_eq!(
        active.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![id3, id1]
    );

    let inactive = service.list(StatusFilter::Inactive).await.unwrap();
    assert_eq!(inactive.iter().map(|w| w.id).collect::<Vec<_>>(), vec![id2]);
}

#[tokio::test]
async fn listing_aggregates_manager_names_ordered_by_paternal_surname() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    // Pérez Soto and Díaz (no maternal name); alphabetized by paternal
    // surname the aggregate starts with Díaz.
    let id = service
        .create(sample_warehouse("BOD1"), vec![1, 2])
        .await
        .unwrap();

    let rows = service.list(StatusFilter::All).await.unwrap();
    let row = rows.iter().find(|w| w.id == id).unwrap();
    assert_eq!(
        row.managers_names.as_deref(),
        Some("María Díaz / Juan Pérez Soto")
    );
}

#[tokio::test]
async fn listing_includes_warehouses_without_managers() {
    let (db, service) = setup().await;

    // Bypass the service to build a manager-less warehouse; the listing must
    // still include it, with an absent aggregate.
    warehouse::ActiveModel {
        code: Set("EMPTY".to_string()),
        name: Set("Sin Encargados".to_string()),
        address: Set("Calle 1".to_string()),
        staff_count: Set(1),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&*db)
    .await
    .unwrap();

    let rows = service.list(StatusFilter::All).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].managers_names.is_none());
}

#[tokio::test]
async fn code_exists_is_case_insensitive_and_honors_exclude_id() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let id = service
        .create(sample_warehouse("BOD1"), vec![1])
        .await
        .unwrap();

    assert!(service.code_exists("bod1", None).await.unwrap());
    assert!(service.code_exists(" BOD1 ", None).await.unwrap());
    assert!(!service.code_exists("BOD2", None).await.unwrap());
    // The warehouse itself is not a conflict during edit
    assert!(!service.code_exists("BOD1", Some(id)).await.unwrap());
}

#[tokio::test]
async fn managers_are_listed_ordered_with_formatted_rut() {
    let (db, service) = setup().await;
    seed_default_managers(&db).await;

    let managers = service.list_managers().await.unwrap();
    assert_eq!(
        managers
            .iter()
            .map(|m| m.last_name_paternal.as_str())
            .collect::<Vec<_>>(),
        vec!["Alarcón", "Díaz", "Pérez"]
    );
    assert_eq!(managers[0].rut, "34567890-1");
    assert_eq!(managers[2].rut, "12345678-9");
}
