use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, LoaderTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use models::{menu, payment, restaurant, restaurant_payment};

use crate::errors::ServiceError;
use crate::restaurant::domain::{Menu, MenuCount, Payment, Restaurant, RestaurantWrite};
use crate::restaurant::repository::RestaurantRepository;

pub struct SeaOrmRestaurantRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[derive(Debug, FromQueryResult)]
struct MenuCountRow {
    restaurant_id: i64,
    name: String,
    count: i64,
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

/// `%needle%`, lower-cased, with LIKE wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn lower_contains<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(contains_pattern(needle)).escape('\\'))
}

fn to_payment(p: payment::Model) -> Payment {
    Payment { id: p.id, payment_type: p.payment_type }
}

/// Attach menus and payments, both ordered by id.
async fn hydrate<C: ConnectionTrait>(db: &C, rows: Vec<restaurant::Model>) -> Result<Vec<Restaurant>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let menus = rows.load_many(menu::Entity, db).await?;
    let payments = rows.load_many_to_many(payment::Entity, restaurant_payment::Entity, db).await?;
    Ok(rows
        .into_iter()
        .zip(menus)
        .zip(payments)
        .map(|((r, mut ms), mut ps)| {
            ms.sort_by_key(|m| m.id);
            ps.sort_by_key(|p| p.id);
            Restaurant {
                id: r.id,
                name: r.name,
                address: r.address,
                city: r.city,
                state: r.state,
                telephone: r.telephone,
                seat_capacity: r.seat_capacity,
                menus: ms.into_iter().map(|m| Menu { id: m.id, dish: m.dish, price: m.price }).collect(),
                payments: ps.into_iter().map(to_payment).collect(),
            }
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(db: &C, row: Option<restaurant::Model>) -> Result<Option<Restaurant>, DbErr> {
    match row {
        Some(r) => Ok(hydrate(db, vec![r]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = restaurant::Entity::find()
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        hydrate(&self.db, rows).await.map_err(db_err)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
        let row = restaurant::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        hydrate_one(&self.db, row).await.map_err(db_err)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>, ServiceError> {
        let row = restaurant::Entity::find()
            .filter(restaurant::Column::Name.eq(name))
            .order_by_asc(restaurant::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        hydrate_one(&self.db, row).await.map_err(db_err)
    }

    async fn find_by_name_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = restaurant::Entity::find()
            .filter(lower_contains(restaurant::Column::Name, sub))
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        hydrate(&self.db, rows).await.map_err(db_err)
    }

    async fn find_by_state_ignoring_case(&self, state: &str) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = restaurant::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(restaurant::Column::State))).eq(state.to_lowercase()))
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        hydrate(&self.db, rows).await.map_err(db_err)
    }

    async fn find_by_menu_dish_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
        let ids: Vec<i64> = menu::Entity::find()
            .select_only()
            .column(menu::Column::RestaurantId)
            .filter(lower_contains(menu::Column::Dish, sub))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = restaurant::Entity::find()
            .filter(restaurant::Column::Id.is_in(ids))
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        hydrate(&self.db, rows).await.map_err(db_err)
    }

    async fn find_menu_counts(&self) -> Result<Vec<MenuCount>, ServiceError> {
        let rows = restaurant::Entity::find()
            .select_only()
            .column_as(restaurant::Column::Id, "restaurant_id")
            .column(restaurant::Column::Name)
            .column_as(Expr::col((menu::Entity, menu::Column::Id)).count(), "count")
            .left_join(menu::Entity)
            .group_by(restaurant::Column::Id)
            .group_by(restaurant::Column::Name)
            .order_by_asc(restaurant::Column::Id)
            .into_model::<MenuCountRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|r| MenuCount { restaurant_id: r.restaurant_id, name: r.name, count: r.count })
            .collect())
    }

    async fn save(&self, write: RestaurantWrite) -> Result<Restaurant, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let requested_id = write.id;

        let scalars = restaurant::ActiveModel {
            id: if requested_id == 0 { NotSet } else { Set(requested_id) },
            name: Set(write.name),
            address: Set(write.address),
            city: Set(write.city),
            state: Set(write.state),
            telephone: Set(write.telephone),
            seat_capacity: Set(write.seat_capacity),
        };
        let saved = if requested_id == 0 {
            scalars.insert(&txn).await.map_err(db_err)?
        } else {
            scalars.update(&txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => ServiceError::not_found("Restaurant", requested_id),
                other => db_err(other),
            })?
        };

        if let Some(menus) = write.menus {
            let removed = menu::Entity::delete_many()
                .filter(menu::Column::RestaurantId.eq(saved.id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            debug!(restaurant_id = saved.id, removed = removed.rows_affected, added = menus.len(), "rebuilding menus");
            for m in menus {
                menu::ActiveModel {
                    id: NotSet,
                    dish: Set(m.dish),
                    price: Set(m.price),
                    restaurant_id: Set(saved.id),
                }
                .insert(&txn)
                .await
                .map_err(db_err)?;
            }
        }

        if let Some(payments) = write.payments {
            restaurant_payment::Entity::delete_many()
                .filter(restaurant_payment::Column::RestaurantId.eq(saved.id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            let ids: BTreeSet<i64> = payments.iter().map(|p| p.id).collect();
            for payment_id in ids {
                restaurant_payment::ActiveModel { restaurant_id: Set(saved.id), payment_id: Set(payment_id) }
                    .insert(&txn)
                    .await
                    .map_err(db_err)?;
            }
        }

        let persisted = hydrate_one(&txn, Some(saved)).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        persisted.ok_or_else(|| ServiceError::Db("restaurant vanished during save".into()))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        // menus and payment links go with it (FK cascade)
        let res = restaurant::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_all(&self) -> Result<(), ServiceError> {
        restaurant::Entity::delete_many().exec(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_payment_by_id(&self, id: i64) -> Result<Option<Payment>, ServiceError> {
        let found = payment::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(to_payment))
    }

    async fn find_all_payments(&self) -> Result<Vec<Payment>, ServiceError> {
        let rows = payment::Entity::find()
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_payment).collect())
    }

    async fn create_payment(&self, payment_type: &str) -> Result<Payment, ServiceError> {
        payment::validate_payment_type(payment_type)?;
        let created = payment::ActiveModel { id: NotSet, payment_type: Set(payment_type.to_string()) }
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(to_payment(created))
    }
}
