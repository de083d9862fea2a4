use crate::{
    db::DbPool,
    entities::{manager, warehouse, warehouse_manager},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction,
    DbBackend, DbErr,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QueryResult, Set,
    SqlErr, Statement, TransactionError, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// The active/inactive/all partition applied to the warehouse listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Inactive,
    All,
}

impl StatusFilter {
    /// Parses the `status` query parameter; anything unrecognized (or
    /// absent) falls back to `All`.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("active") => StatusFilter::Active,
            Some("inactive") => StatusFilter::Inactive,
            _ => StatusFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
            StatusFilter::All => "all",
        }
    }
}

/// A warehouse row as produced by the listing query: every warehouse column
/// plus the aggregated manager names for the group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub address: String,
    pub staff_count: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Assigned managers' full names joined with `" / "`, ordered by
    /// paternal last name. Absent when the warehouse has no managers.
    pub managers_names: Option<String>,
}

impl FromQueryResult for WarehouseSummary {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            id: res.try_get(pre, "id")?,
            code: res.try_get(pre, "code")?,
            name: res.try_get(pre, "name")?,
            address: res.try_get(pre, "address")?,
            staff_count: res.try_get(pre, "staff_count")?,
            active: normalize_bool(res, pre, "active")?,
            created_at: res.try_get(pre, "created_at")?,
            managers_names: res.try_get(pre, "managers_names")?,
        })
    }
}

/// Normalizes the boolean encodings different drivers hand back for a raw
/// query: native bool, integer 0/1, or textual `t`/`f`/`true`/`false`/`1`/`0`.
/// Nothing downstream ever sees the raw form.
fn normalize_bool(res: &QueryResult, pre: &str, col: &str) -> Result<bool, DbErr> {
    if let Ok(value) = res.try_get::<bool>(pre, col) {
        return Ok(value);
    }
    if let Ok(value) = res.try_get::<i64>(pre, col) {
        return Ok(value != 0);
    }
    let value: String = res.try_get(pre, col)?;
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "t" | "true" | "1"
    ))
}

/// A warehouse record plus its currently assigned manager ids.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseDetail {
    #[serde(flatten)]
    pub warehouse: warehouse::Model,
    pub manager_ids: Vec<i32>,
}

/// A manager row augmented with the formatted tax id for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSummary {
    pub id: i32,
    pub rut_number: i32,
    pub rut_check_digit: String,
    pub rut: String,
    pub first_name: String,
    pub last_name_paternal: String,
    pub last_name_maternal: Option<String>,
}

impl ManagerSummary {
    /// Full display name: first name, paternal last name, then the maternal
    /// last name when present.
    pub fn full_name(&self) -> String {
        match &self.last_name_maternal {
            Some(maternal) => {
                format!("{} {} {}", self.first_name, self.last_name_paternal, maternal)
            }
            None => format!("{} {}", self.first_name, self.last_name_paternal),
        }
    }
}

impl From<manager::Model> for ManagerSummary {
    fn from(model: manager::Model) -> Self {
        Self {
            id: model.id,
            rut: model.formatted_rut(),
            rut_number: model.rut_number,
            rut_check_digit: model.rut_check_digit,
            first_name: model.first_name,
            last_name_paternal: model.last_name_paternal,
            last_name_maternal: model.last_name_maternal,
        }
    }
}

/// Fields accepted when creating a warehouse.
#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub code: String,
    pub name: String,
    pub address: String,
    pub staff_count: i32,
    pub active: bool,
}

/// Mutable fields accepted when editing a warehouse. `code` and `created_at`
/// are never touched after creation.
#[derive(Debug, Clone)]
pub struct WarehouseUpdate {
    pub name: String,
    pub address: String,
    pub staff_count: i32,
    pub active: bool,
}

/// Service owning every read and write against the warehouse, manager and
/// assignment tables. Multi-statement mutations run inside one transaction
/// that rolls back entirely on any failure.
#[derive(Clone)]
pub struct WarehouseService {
    db: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lists warehouses newest-first, each with the aggregated manager names
    /// for its group.
    ///
    /// This is a left-outer join across warehouse -> assignment -> manager,
    /// grouped by every warehouse column, with the name concatenation ordered
    /// by paternal last name inside each group. The string aggregate differs
    /// per backend; the SQLite form needs 3.44+ for ORDER BY inside an
    /// aggregate (the bundled sqlx build is newer than that).
    #[instrument(skip(self))]
    pub async fn list(&self, filter: StatusFilter) -> Result<Vec<WarehouseSummary>, ServiceError> {
        let db = &*self.db;
        let backend = db.get_database_backend();

        let full_name =
            "m.first_name || ' ' || m.last_name_paternal || COALESCE(' ' || m.last_name_maternal, '')";
        let aggregate = match backend {
            DbBackend::Postgres => format!(
                "STRING_AGG({full_name}, ' / ' ORDER BY m.last_name_paternal)"
            ),
            _ => format!("GROUP_CONCAT({full_name}, ' / ' ORDER BY m.last_name_paternal)"),
        };
        let where_clause = match filter {
            StatusFilter::Active => "WHERE w.active = TRUE",
            StatusFilter::Inactive => "WHERE w.active = FALSE",
            StatusFilter::All => "",
        };

        let sql = format!(
            "SELECT \
                w.id, w.code, w.name, w.address, w.staff_count, w.active, w.created_at, \
                {aggregate} AS managers_names \
             FROM warehouses w \
             LEFT JOIN warehouse_managers wm ON wm.warehouse_id = w.id \
             LEFT JOIN managers m ON m.id = wm.manager_id \
             {where_clause} \
             GROUP BY w.id, w.code, w.name, w.address, w.staff_count, w.active, w.created_at \
             ORDER BY w.created_at DESC"
        );

        let rows = WarehouseSummary::find_by_statement(Statement::from_string(backend, sql))
            .all(db)
            .await?;
        Ok(rows)
    }

    /// Fetches a warehouse with its assigned manager ids, or `None` when no
    /// row matches.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<Option<WarehouseDetail>, ServiceError> {
        let db = &*self.db;
        let Some(model) = warehouse::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let manager_ids = warehouse_manager::Entity::find()
            .filter(warehouse_manager::Column::WarehouseId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.manager_id)
            .collect();

        Ok(Some(WarehouseDetail {
            warehouse: model,
            manager_ids,
        }))
    }

    /// Whether `code` is already taken. Codes are stored uppercased, so the
    /// input is uppercased before comparing; `exclude_id` exempts one
    /// warehouse (used during edit, where the code never changes anyway).
    #[instrument(skip(self))]
    pub async fn code_exists(
        &self,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let db = &*self.db;
        let code = code.trim().to_uppercase();

        let mut query = warehouse::Entity::find().filter(warehouse::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            query = query.filter(warehouse::Column::Id.ne(id));
        }

        Ok(query.count(db).await? > 0)
    }

    /// Creates a warehouse and its assignment rows in one transaction,
    /// returning the new id. The code is uppercased and trimmed before
    /// insert; a storage-level unique violation on it surfaces as the
    /// duplicate-code error.
    #[instrument(skip(self, data))]
    pub async fn create(
        &self,
        data: NewWarehouse,
        manager_ids: Vec<i32>,
    ) -> Result<i32, ServiceError> {
        if manager_ids.is_empty() {
            return Err(ServiceError::EmptyManagerSet);
        }

        let db = &*self.db;
        let id = db
            .transaction::<_, i32, ServiceError>(move |txn| {
                Box::pin(async move {
                    let code = data.code.trim().to_uppercase();
                    let inserted = warehouse::ActiveModel {
                        code: Set(code.clone()),
                        name: Set(data.name.trim().to_string()),
                        address: Set(data.address.trim().to_string()),
                        staff_count: Set(data.staff_count),
                        active: Set(data.active),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(|err| map_insert_error(err, &code))?;

                    assign_managers(txn, inserted.id, &manager_ids).await?;
                    Ok(inserted.id)
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(warehouse_id = id, "warehouse created");
        Ok(id)
    }

    /// Updates the mutable warehouse fields and replaces the whole
    /// assignment set (delete then re-insert, not a diff) in one transaction.
    #[instrument(skip(self, data))]
    pub async fn edit(
        &self,
        id: i32,
        data: WarehouseUpdate,
        manager_ids: Vec<i32>,
    ) -> Result<(), ServiceError> {
        if manager_ids.is_empty() {
            return Err(ServiceError::EmptyManagerSet);
        }

        let db = &*self.db;
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                warehouse::Entity::update_many()
                    .col_expr(warehouse::Column::Name, Expr::value(data.name.trim()))
                    .col_expr(warehouse::Column::Address, Expr::value(data.address.trim()))
                    .col_expr(warehouse::Column::StaffCount, Expr::value(data.staff_count))
                    .col_expr(warehouse::Column::Active, Expr::value(data.active))
                    .filter(warehouse::Column::Id.eq(id))
                    .exec(txn)
                    .await?;

                warehouse_manager::Entity::delete_many()
                    .filter(warehouse_manager::Column::WarehouseId.eq(id))
                    .exec(txn)
                    .await?;

                assign_managers(txn, id, &manager_ids).await?;
                Ok(())
            })
        })
        .await
        .map_err(unwrap_transaction_error)?;

        info!(warehouse_id = id, "warehouse updated");
        Ok(())
    }

    /// Deletes a warehouse and its assignment rows. A missing id is a
    /// not-found error, so callers can tell "nothing happened" from success.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db;
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                // The FK cascade covers this on engines that enforce it, but
                // deleting explicitly guarantees no orphaned assignments.
                warehouse_manager::Entity::delete_many()
                    .filter(warehouse_manager::Column::WarehouseId.eq(id))
                    .exec(txn)
                    .await?;

                let result = warehouse::Entity::delete_by_id(id).exec(txn).await?;
                if result.rows_affected == 0 {
                    return Err(ServiceError::NotFound("Warehouse not found.".to_string()));
                }
                Ok(())
            })
        })
        .await
        .map_err(unwrap_transaction_error)?;

        info!(warehouse_id = id, "warehouse deleted");
        Ok(())
    }

    /// Lists every manager, ordered by paternal last name, maternal last
    /// name, then first name, with the tax id formatted for display.
    #[instrument(skip(self))]
    pub async fn list_managers(&self) -> Result<Vec<ManagerSummary>, ServiceError> {
        let db = &*self.db;
        let rows = manager::Entity::find()
            .order_by_asc(manager::Column::LastNamePaternal)
            .order_by_asc(manager::Column::LastNameMaternal)
            .order_by_asc(manager::Column::FirstName)
            .all(db)
            .await?;

        Ok(rows.into_iter().map(ManagerSummary::from).collect())
    }
}

/// Inserts one assignment row per manager id.
async fn assign_managers(
    txn: &DatabaseTransaction,
    warehouse_id: i32,
    manager_ids: &[i32],
) -> Result<(), ServiceError> {
    let rows = manager_ids.iter().map(|&manager_id| warehouse_manager::ActiveModel {
        warehouse_id: Set(warehouse_id),
        manager_id: Set(manager_id),
    });
    warehouse_manager::Entity::insert_many(rows).exec(txn).await?;
    Ok(())
}

fn map_insert_error(err: DbErr, code: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::DuplicateCode(code.to_string())
        }
        _ => ServiceError::DatabaseError(err),
    }
}

fn unwrap_transaction_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
