use async_trait::async_trait;
use chrono::Utc;
use common::{BuyerId, ItemId, Money, OrderId, OrderState, PartnerId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    ItemRecord, OrderRecord, Result, StoreError,
    store::{OrderStore, OrderUpdate},
};

const ORDER_COLUMNS: &str =
    "id, buyer_id, partner_id, item_id, price_cents, state, waybill_number, created_at, updated_at";

/// PostgreSQL-backed order store implementation.
///
/// The state column is constrained to the closed tag set in the schema and
/// re-validated on read, so a row can never carry an unknown state into
/// the domain layer.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        let tag: String = row.try_get("state")?;
        let state = OrderState::parse(&tag).ok_or_else(|| StoreError::UnknownState(tag))?;

        Ok(OrderRecord {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            buyer_id: BuyerId::from_uuid(row.try_get::<Uuid, _>("buyer_id")?),
            partner_id: PartnerId::from_uuid(row.try_get::<Uuid, _>("partner_id")?),
            item_id: ItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
            price: Money::from_cents(row.try_get("price_cents")?),
            state,
            waybill_number: row.try_get("waybill_number")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<ItemRecord> {
        Ok(ItemRecord {
            id: ItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            partner_id: row
                .try_get::<Option<Uuid>, _>("partner_id")?
                .map(PartnerId::from_uuid),
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_order(&self, record: OrderRecord) -> Result<OrderRecord> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders (id, buyer_id, partner_id, item_id, price_cents, state, waybill_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(record.id.as_uuid())
        .bind(record.buyer_id.as_uuid())
        .bind(record.partner_id.as_uuid())
        .bind(record.item_id.as_uuid())
        .bind(record.price.cents())
        .bind(record.state.as_str())
        .bind(&record.waybill_number)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Duplicate primary key means the order was already placed
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_pkey")
            {
                return StoreError::DuplicateOrder(record.id);
            }
            StoreError::Database(e)
        })?;

        Self::row_to_order(row)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn transition_order(
        &self,
        id: OrderId,
        expected: OrderState,
        update: OrderUpdate,
    ) -> Result<OrderRecord> {
        // Conditional update: the WHERE clause carries the expected state,
        // so a lost race updates zero rows instead of clobbering a
        // concurrent transition.
        let row = sqlx::query(&format!(
            r#"
            UPDATE orders
            SET state = $2,
                waybill_number = COALESCE($3, waybill_number),
                updated_at = $4
            WHERE id = $1 AND state = $5
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(id.as_uuid())
        .bind(update.state.as_str())
        .bind(&update.waybill_number)
        .bind(Utc::now())
        .bind(expected.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => {
                // Distinguish a lost race from a missing order.
                match self.find_order(id).await? {
                    Some(current) => Err(StoreError::StateConflict {
                        order_id: id,
                        expected,
                        actual: current.state,
                    }),
                    None => Err(StoreError::OrderNotFound(id)),
                }
            }
        }
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<ItemRecord>> {
        let row = sqlx::query("SELECT id, name, price_cents, partner_id FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn find_orders_awaiting_receipt(
        &self,
        partner_id: PartnerId,
    ) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE partner_id = $1 AND state = 'receiving'
            ORDER BY created_at
            "#,
        ))
        .bind(partner_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }
}
