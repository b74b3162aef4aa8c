use async_trait::async_trait;

use super::domain::{MenuCount, Payment, Restaurant, RestaurantWrite};
use crate::errors::ServiceError;

/// Repository abstraction for restaurant persistence.
///
/// String predicates named `*_ignoring_case` compare case-insensitively;
/// `*_containing_*` match the needle anywhere in the target.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, ServiceError>;
    /// Exact name match; the lowest id wins if several rows share the name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>, ServiceError>;
    async fn find_by_name_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError>;
    async fn find_by_state_ignoring_case(&self, state: &str) -> Result<Vec<Restaurant>, ServiceError>;
    /// Restaurants with at least one matching dish, each listed once.
    async fn find_by_menu_dish_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError>;
    /// One row per restaurant, including those without menus.
    async fn find_menu_counts(&self) -> Result<Vec<MenuCount>, ServiceError>;

    /// Insert (`id == 0`) or update, rebuilding the children the write carries.
    /// All of it commits or none of it does.
    async fn save(&self, write: RestaurantWrite) -> Result<Restaurant, ServiceError>;
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn delete_all(&self) -> Result<(), ServiceError>;

    async fn find_payment_by_id(&self, id: i64) -> Result<Option<Payment>, ServiceError>;
    async fn find_all_payments(&self) -> Result<Vec<Payment>, ServiceError>;
    async fn create_payment(&self, payment_type: &str) -> Result<Payment, ServiceError>;
}

/// In-memory repository for tests, doc examples and `memory://` development runs
pub mod memory {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use tokio::sync::RwLock;

    use crate::restaurant::domain::Menu;

    #[derive(Default)]
    struct Tables {
        restaurants: BTreeMap<i64, Restaurant>,
        payments: BTreeMap<i64, Payment>,
        last_restaurant_id: i64,
        last_menu_id: i64,
        last_payment_id: i64,
    }

    #[derive(Default)]
    pub struct InMemoryRestaurantRepository {
        tables: RwLock<Tables>,
    }

    impl InMemoryRestaurantRepository {
        pub fn new() -> Self { Self::default() }
    }

    fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    #[async_trait]
    impl RestaurantRepository for InMemoryRestaurantRepository {
        async fn find_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.restaurants.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.restaurants.get(&id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.restaurants.values().find(|r| r.name == name).cloned())
        }

        async fn find_by_name_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.restaurants.values().filter(|r| contains_ignoring_case(&r.name, sub)).cloned().collect())
        }

        async fn find_by_state_ignoring_case(&self, state: &str) -> Result<Vec<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            let wanted = state.to_lowercase();
            Ok(t
                .restaurants
                .values()
                .filter(|r| r.state.as_deref().map(str::to_lowercase).as_deref() == Some(wanted.as_str()))
                .cloned()
                .collect())
        }

        async fn find_by_menu_dish_containing_ignoring_case(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t
                .restaurants
                .values()
                .filter(|r| r.menus.iter().any(|m| contains_ignoring_case(&m.dish, sub)))
                .cloned()
                .collect())
        }

        async fn find_menu_counts(&self) -> Result<Vec<MenuCount>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t
                .restaurants
                .values()
                .map(|r| MenuCount { restaurant_id: r.id, name: r.name.clone(), count: r.menus.len() as i64 })
                .collect())
        }

        async fn save(&self, write: RestaurantWrite) -> Result<Restaurant, ServiceError> {
            let mut t = self.tables.write().await;

            // Mirror the relational constraints before touching anything.
            if t.restaurants.values().any(|r| r.name == write.name && r.id != write.id) {
                return Err(ServiceError::Db(format!("duplicate restaurant name: {}", write.name)));
            }
            if let Some(payments) = &write.payments {
                if let Some(missing) = payments.iter().find(|p| !t.payments.contains_key(&p.id)) {
                    return Err(ServiceError::Db(format!("payment {} violates foreign key", missing.id)));
                }
            }
            let previous = if write.id == 0 {
                None
            } else {
                Some(t.restaurants.get(&write.id).cloned().ok_or_else(|| ServiceError::not_found("Restaurant", write.id))?)
            };

            let id = match previous {
                Some(_) => write.id,
                None => {
                    t.last_restaurant_id += 1;
                    t.last_restaurant_id
                }
            };

            let menus = match write.menus {
                Some(new_menus) => {
                    let mut rebuilt = Vec::with_capacity(new_menus.len());
                    for m in new_menus {
                        t.last_menu_id += 1;
                        rebuilt.push(Menu { id: t.last_menu_id, dish: m.dish, price: m.price });
                    }
                    rebuilt
                }
                None => previous.as_ref().map(|p| p.menus.clone()).unwrap_or_default(),
            };

            let payments = match write.payments {
                Some(refs) => {
                    let ids: BTreeSet<i64> = refs.iter().map(|p| p.id).collect();
                    ids.iter().filter_map(|pid| t.payments.get(pid).cloned()).collect()
                }
                None => previous.as_ref().map(|p| p.payments.clone()).unwrap_or_default(),
            };

            let saved = Restaurant {
                id,
                name: write.name,
                address: write.address,
                city: write.city,
                state: write.state,
                telephone: write.telephone,
                seat_capacity: write.seat_capacity,
                menus,
                payments,
            };
            t.restaurants.insert(id, saved.clone());
            Ok(saved)
        }

        async fn delete_by_id(&self, id: i64) -> Result<bool, ServiceError> {
            let mut t = self.tables.write().await;
            Ok(t.restaurants.remove(&id).is_some())
        }

        async fn delete_all(&self) -> Result<(), ServiceError> {
            let mut t = self.tables.write().await;
            t.restaurants.clear();
            Ok(())
        }

        async fn find_payment_by_id(&self, id: i64) -> Result<Option<Payment>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.payments.get(&id).cloned())
        }

        async fn find_all_payments(&self) -> Result<Vec<Payment>, ServiceError> {
            let t = self.tables.read().await;
            Ok(t.payments.values().cloned().collect())
        }

        async fn create_payment(&self, payment_type: &str) -> Result<Payment, ServiceError> {
            models::payment::validate_payment_type(payment_type)?;
            let mut t = self.tables.write().await;
            if t.payments.values().any(|p| p.payment_type == payment_type) {
                return Err(ServiceError::Db(format!("duplicate payment type: {}", payment_type)));
            }
            t.last_payment_id += 1;
            let p = Payment { id: t.last_payment_id, payment_type: payment_type.to_string() };
            t.payments.insert(p.id, p.clone());
            Ok(p)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::restaurant::domain::MenuInput;

        fn write(name: &str, state: &str, dishes: &[&str]) -> RestaurantWrite {
            RestaurantWrite {
                id: 0,
                name: name.into(),
                address: None,
                city: None,
                state: Some(state.into()),
                telephone: None,
                seat_capacity: 10,
                menus: Some(dishes.iter().map(|d| MenuInput { dish: d.to_string(), price: 5.0 }).collect()),
                payments: Some(vec![]),
            }
        }

        #[tokio::test]
        async fn filters_are_case_insensitive() {
            let repo = InMemoryRestaurantRepository::new();
            repo.save(write("Apple", "ST", &["Chocolate Cake", "Cake Pop"])).await.unwrap();
            repo.save(write("Eagle Cafe", "co", &["Tacos"])).await.unwrap();

            let by_name = repo.find_by_name_containing_ignoring_case("APP").await.unwrap();
            assert_eq!(by_name.len(), 1);
            let by_state = repo.find_by_state_ignoring_case("CO").await.unwrap();
            assert_eq!(by_state.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["Eagle Cafe"]);
            // exact, not substring
            assert!(repo.find_by_state_ignoring_case("C").await.unwrap().is_empty());

            // two matching dishes, one restaurant
            let by_dish = repo.find_by_menu_dish_containing_ignoring_case("cak").await.unwrap();
            assert_eq!(by_dish.len(), 1);
            assert_eq!(by_dish[0].name, "Apple");
        }

        #[tokio::test]
        async fn menu_counts_include_empty_restaurants() {
            let repo = InMemoryRestaurantRepository::new();
            let a = repo.save(write("Apple", "ST", &["Pie", "Tart"])).await.unwrap();
            let b = repo.save(write("Empty", "ST", &[])).await.unwrap();
            let counts = repo.find_menu_counts().await.unwrap();
            assert_eq!(
                counts,
                vec![
                    MenuCount { restaurant_id: a.id, name: "Apple".into(), count: 2 },
                    MenuCount { restaurant_id: b.id, name: "Empty".into(), count: 0 },
                ]
            );
        }

        #[tokio::test]
        async fn unknown_payment_rejected_without_persisting() {
            let repo = InMemoryRestaurantRepository::new();
            let mut w = write("Apple", "ST", &[]);
            w.payments = Some(vec![Payment { id: 9999, payment_type: "Gold".into() }]);
            assert!(repo.save(w).await.is_err());
            assert!(repo.find_all().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn update_of_missing_id_is_not_found() {
            let repo = InMemoryRestaurantRepository::new();
            let mut w = write("Ghost", "ST", &[]);
            w.id = 41;
            assert!(matches!(repo.save(w).await, Err(ServiceError::NotFound(_))));
        }

        #[tokio::test]
        async fn duplicate_names_rejected() {
            let repo = InMemoryRestaurantRepository::new();
            repo.save(write("Apple", "ST", &[])).await.unwrap();
            assert!(matches!(repo.save(write("Apple", "CO", &[])).await, Err(ServiceError::Db(_))));
        }

        #[tokio::test]
        async fn payments_deduplicated_and_retained_when_absent() {
            let repo = InMemoryRestaurantRepository::new();
            let cash = repo.create_payment("Cash").await.unwrap();
            let mut w = write("Apple", "ST", &["Pie"]);
            w.payments = Some(vec![cash.clone(), cash.clone()]);
            let saved = repo.save(w).await.unwrap();
            assert_eq!(saved.payments, vec![cash.clone()]);

            let mut keep = RestaurantWrite::from_existing(&saved);
            keep.seat_capacity = 99;
            let updated = repo.save(keep).await.unwrap();
            assert_eq!(updated.payments, vec![cash]);
            assert_eq!(updated.menus, saved.menus);
            assert_eq!(updated.seat_capacity, 99);
        }
    }
}
