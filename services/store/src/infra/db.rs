use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionError, TransactionTrait,
    sea_query::{Alias, Expr, OnConflict},
};
use uuid::Uuid;

use felino_core::sea_ext::DbErrExt as _;
use felino_domain::chat::ChatRole;
use felino_domain::user::UserRole;
use felino_store_schema::{
    cart_items, chat_sessions, chat_turns, order_items, orders, products, users,
};

use crate::domain::repository::{
    CartRepository, ChatSessionRepository, OrderRepository, ProductRepository, UserRepository,
};
use crate::domain::types::{
    CartLine, ChatSession, ChatTurn, NewOrder, Order, OrderItem, Product, User,
};
use crate::error::StoreServiceError;

/// Map a unique-constraint violation to `taken`; anything else is internal.
fn unique_or_internal(err: DbErr, taken: StoreServiceError, ctx: &'static str) -> StoreServiceError {
    if err.is_unique_violation() {
        taken
    } else {
        StoreServiceError::Internal(anyhow::Error::new(err).context(ctx))
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreServiceError> {
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or_internal(e, StoreServiceError::UsernameTaken, "create user"))?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> Result<User, StoreServiceError> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("stored role of user {}", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn list(&self) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .order_by_asc(products::Column::CreatedAt)
            .order_by_asc(products::Column::Id)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find products by ids")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreServiceError> {
        let model = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find product by name")?;
        Ok(model.map(product_from_model))
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        product_active_model(product)
            .insert(&self.db)
            .await
            .map_err(|e| {
                unique_or_internal(e, StoreServiceError::ProductNameTaken, "create product")
            })?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<(), StoreServiceError> {
        match product_active_model(product).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(StoreServiceError::ProductNotFound),
            Err(e) => Err(unique_or_internal(
                e,
                StoreServiceError::ProductNameTaken,
                "update product",
            )),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_active_model(product: &Product) -> products::ActiveModel {
    products::ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        stock: Set(product.stock),
        image_url: Set(product.image_url.clone()),
        category: Set(product.category.clone()),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        image_url: model.image_url,
        category: model.category,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_asc(cart_items::Column::CreatedAt)
            .find_also_related(products::Entity)
            .all(&self.db)
            .await
            .context("list cart lines")?;
        // FK cascade keeps lines and products in sync; a missing product is skipped.
        Ok(rows
            .into_iter()
            .filter_map(|(line, product)| {
                product.map(|p| CartLine {
                    product: product_from_model(p),
                    quantity: line.quantity,
                })
            })
            .collect())
    }

    async fn find_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<i32>, StoreServiceError> {
        let model = cart_items::Entity::find_by_id((user_id, product_id))
            .one(&self.db)
            .await
            .context("find cart line")?;
        Ok(model.map(|m| m.quantity))
    }

    async fn add_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError> {
        let am = cart_items::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(Utc::now()),
        };
        cart_items::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([cart_items::Column::UserId, cart_items::Column::ProductId])
                    .value(
                        cart_items::Column::Quantity,
                        Expr::col((cart_items::Entity, cart_items::Column::Quantity)).add(
                            Expr::col((Alias::new("excluded"), cart_items::Column::Quantity)),
                        ),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert cart line")?;
        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreServiceError> {
        cart_items::Entity::update_many()
            .col_expr(cart_items::Column::Quantity, Expr::value(quantity))
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .context("set cart line quantity")?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreServiceError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .context("remove cart line")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn place(&self, order: &NewOrder) -> Result<Order, StoreServiceError> {
        let order = order.clone();
        self.db
            .transaction::<_, Order, StoreServiceError>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    for line in &order.items {
                        // Row lock serializes concurrent orders on the same product.
                        let model = products::Entity::find_by_id(line.product_id)
                            .lock_exclusive()
                            .one(txn)
                            .await
                            .context("lock product")?
                            .ok_or(StoreServiceError::ProductNotFound)?;
                        let mut product = product_from_model(model);
                        product.reserve(line.quantity)?;
                        products::ActiveModel {
                            id: Set(product.id),
                            stock: Set(product.stock),
                            updated_at: Set(now),
                            ..Default::default()
                        }
                        .update(txn)
                        .await
                        .context("decrement stock")?;
                    }

                    let order_id = Uuid::now_v7();
                    orders::ActiveModel {
                        id: Set(order_id),
                        user_id: Set(order.user_id),
                        total_amount: Set(order.total_amount),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await
                    .context("insert order")?;

                    let items = order.items.iter().enumerate().map(|(position, line)| {
                        order_items::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            order_id: Set(order_id),
                            product_id: Set(Some(line.product_id)),
                            quantity: Set(line.quantity),
                            position: Set(position as i32),
                        }
                    });
                    order_items::Entity::insert_many(items)
                        .exec_without_returning(txn)
                        .await
                        .context("insert order items")?;

                    Ok(Order {
                        id: order_id,
                        user_id: order.user_id,
                        items: order
                            .items
                            .iter()
                            .map(|line| OrderItem {
                                product_id: Some(line.product_id),
                                quantity: line.quantity,
                            })
                            .collect(),
                        total_amount: order.total_amount,
                        created_at: now,
                    })
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) => {
                    StoreServiceError::Internal(anyhow::Error::new(e).context("order transaction"))
                }
                TransactionError::Transaction(e) => e,
            })
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        self.with_items(models).await
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreServiceError> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.db)
            .await
            .context("list all orders")?;
        self.with_items(models).await
    }
}

impl DbOrderRepository {
    async fn with_items(&self, models: Vec<orders::Model>) -> Result<Vec<Order>, StoreServiceError> {
        if models.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = order_items::Entity::find()
            .filter(order_items::Column::OrderId.is_in(ids))
            .order_by_asc(order_items::Column::Position)
            .all(&self.db)
            .await
            .context("list order items")?;

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            items.entry(row.order_id).or_default().push(OrderItem {
                product_id: row.product_id,
                quantity: row.quantity,
            });
        }

        Ok(models
            .into_iter()
            .map(|m| Order {
                items: items.remove(&m.id).unwrap_or_default(),
                id: m.id,
                user_id: m.user_id,
                total_amount: m.total_amount,
                created_at: m.created_at,
            })
            .collect())
    }
}

// ── Chat session repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChatSessionRepository {
    pub db: DatabaseConnection,
}

impl ChatSessionRepository for DbChatSessionRepository {
    async fn find_or_create(&self, user_id: Uuid) -> Result<ChatSession, StoreServiceError> {
        let now = Utc::now();
        chat_sessions::Entity::insert(chat_sessions::ActiveModel {
            user_id: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::column(chat_sessions::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("ensure chat session")?;

        let model = chat_sessions::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find chat session")?
            .context("chat session missing after upsert")?;
        Ok(ChatSession {
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn turns(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ChatTurn>, StoreServiceError> {
        let query = chat_turns::Entity::find().filter(chat_turns::Column::UserId.eq(user_id));
        let models = match limit {
            Some(n) => {
                let mut recent = query
                    .order_by_desc(chat_turns::Column::Id)
                    .limit(n)
                    .all(&self.db)
                    .await
                    .context("list recent chat turns")?;
                recent.reverse();
                recent
            }
            None => query
                .order_by_asc(chat_turns::Column::Id)
                .all(&self.db)
                .await
                .context("list chat turns")?,
        };
        models.into_iter().map(chat_turn_from_model).collect()
    }

    async fn append_exchange(
        &self,
        user_id: Uuid,
        user_text: &str,
        reply: &str,
    ) -> Result<(), StoreServiceError> {
        let user_text = user_text.to_owned();
        let reply = reply.to_owned();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    for (role, content) in [(ChatRole::User, user_text), (ChatRole::Assistant, reply)]
                    {
                        chat_turns::ActiveModel {
                            user_id: Set(user_id),
                            role: Set(role.as_str().to_owned()),
                            content: Set(content),
                            created_at: Set(now),
                            ..Default::default()
                        }
                        .insert(txn)
                        .await?;
                    }
                    chat_sessions::Entity::update_many()
                        .col_expr(chat_sessions::Column::UpdatedAt, Expr::value(now))
                        .filter(chat_sessions::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("append chat exchange")?;
        Ok(())
    }
}

fn chat_turn_from_model(model: chat_turns::Model) -> Result<ChatTurn, StoreServiceError> {
    let role = model
        .role
        .parse::<ChatRole>()
        .with_context(|| format!("stored role of chat turn {}", model.id))?;
    Ok(ChatTurn {
        role,
        content: model.content,
        created_at: model.created_at,
    })
}
