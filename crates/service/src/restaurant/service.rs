use std::sync::Arc;

use tracing::{info, instrument};

use models::{menu, restaurant};

use super::domain::{MenuCount, MenuInput, Payment, PaymentRef, Restaurant, RestaurantInput, RestaurantWrite};
use super::repository::RestaurantRepository;
use crate::errors::ServiceError;

/// Restaurant record service, independent of web framework.
///
/// Enforces existence before update/delete, full-replace semantics for
/// create and replace, partial-merge semantics for merge, and resolves every
/// payment reference against storage before anything is written.
pub struct RestaurantService<R: RestaurantRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RestaurantRepository + ?Sized> RestaurantService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    pub async fn list(&self) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Restaurant, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Restaurant", id))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Restaurant, ServiceError> {
        self.repo
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("Restaurant", name))
    }

    pub async fn search_by_name(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_by_name_containing_ignoring_case(sub).await
    }

    pub async fn search_by_state(&self, state: &str) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_by_state_ignoring_case(state).await
    }

    pub async fn search_by_dish(&self, sub: &str) -> Result<Vec<Restaurant>, ServiceError> {
        self.repo.find_by_menu_dish_containing_ignoring_case(sub).await
    }

    pub async fn menu_counts(&self) -> Result<Vec<MenuCount>, ServiceError> {
        self.repo.find_menu_counts().await
    }

    /// Create a new restaurant; any client-chosen id is discarded.
    ///
    /// # Examples
    /// ```
    /// use service::restaurant::{domain::{MenuInput, RestaurantInput}, repository::memory::InMemoryRestaurantRepository};
    /// use service::RestaurantService;
    /// use std::sync::Arc;
    /// let svc = RestaurantService::new(Arc::new(InMemoryRestaurantRepository::new()));
    /// let mut input = RestaurantInput::named("Supreme Eats");
    /// input.state = Some("CO".into());
    /// input.menus = vec![MenuInput { dish: "Burger".into(), price: 9.99 }];
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert!(created.id > 0);
    /// assert_eq!(created.menus[0].dish, "Burger");
    /// ```
    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn create(&self, input: RestaurantInput) -> Result<Restaurant, ServiceError> {
        let write = self.full_write(0, input).await?;
        let saved = self.repo.save(write).await?;
        info!(restaurant_id = saved.id, name = %saved.name, menus = saved.menus.len(), "restaurant_created");
        Ok(saved)
    }

    /// Overwrite every field of an existing restaurant, rebuilding its menus
    /// and payment links from `input`.
    #[instrument(skip(self, input))]
    pub async fn replace(&self, id: i64, input: RestaurantInput) -> Result<Restaurant, ServiceError> {
        self.get_by_id(id).await?;
        let write = self.full_write(id, input).await?;
        let saved = self.repo.save(write).await?;
        info!(restaurant_id = saved.id, menus = saved.menus.len(), payments = saved.payments.len(), "restaurant_replaced");
        Ok(saved)
    }

    /// Apply only the fields `input` supplies.
    ///
    /// Strings override when present, `seat_capacity` when present, and a child
    /// collection only when the supplied list is non-empty.
    #[instrument(skip(self, input))]
    pub async fn merge(&self, id: i64, input: RestaurantInput) -> Result<Restaurant, ServiceError> {
        let existing = self.get_by_id(id).await?;
        let mut write = RestaurantWrite::from_existing(&existing);

        if let Some(name) = input.name {
            restaurant::validate_name(&name)?;
            write.name = name;
        }
        if let Some(address) = input.address { write.address = Some(address); }
        if let Some(city) = input.city { write.city = Some(city); }
        if let Some(state) = input.state { write.state = Some(state); }
        if let Some(telephone) = input.telephone { write.telephone = Some(telephone); }
        if let Some(seats) = input.seat_capacity {
            restaurant::validate_seat_capacity(seats)?;
            write.seat_capacity = seats;
        }

        restaurant::validate_contact(
            write.address.as_deref(),
            write.city.as_deref(),
            write.state.as_deref(),
            write.telephone.as_deref(),
        )?;

        if !input.payments.is_empty() {
            write.payments = Some(self.resolve_payments(&input.payments).await?);
        }
        if !input.menus.is_empty() {
            validate_menus(&input.menus)?;
            write.menus = Some(input.menus);
        }

        let saved = self.repo.save(write).await?;
        info!(restaurant_id = saved.id, "restaurant_merged");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.repo.delete_by_id(id).await? {
            return Err(ServiceError::not_found("Restaurant", id));
        }
        info!(restaurant_id = id, "restaurant_deleted");
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<(), ServiceError> {
        self.repo.delete_all().await?;
        info!("all restaurants deleted");
        Ok(())
    }

    async fn full_write(&self, id: i64, input: RestaurantInput) -> Result<RestaurantWrite, ServiceError> {
        let name = input.name.unwrap_or_default();
        restaurant::validate_name(&name)?;
        restaurant::validate_contact(
            input.address.as_deref(),
            input.city.as_deref(),
            input.state.as_deref(),
            input.telephone.as_deref(),
        )?;
        let seat_capacity = input.seat_capacity.unwrap_or(0);
        restaurant::validate_seat_capacity(seat_capacity)?;
        validate_menus(&input.menus)?;
        let payments = self.resolve_payments(&input.payments).await?;

        Ok(RestaurantWrite {
            id,
            name,
            address: input.address,
            city: input.city,
            state: input.state,
            telephone: input.telephone,
            seat_capacity,
            menus: Some(input.menus),
            payments: Some(payments),
        })
    }

    async fn resolve_payments(&self, refs: &[PaymentRef]) -> Result<Vec<Payment>, ServiceError> {
        let mut resolved = Vec::with_capacity(refs.len());
        for r in refs {
            let p = self
                .repo
                .find_payment_by_id(r.id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Payment", r.id))?;
            resolved.push(p);
        }
        Ok(resolved)
    }
}

fn validate_menus(menus: &[MenuInput]) -> Result<(), ServiceError> {
    for m in menus {
        menu::validate_dish(&m.dish)?;
        menu::validate_price(m.price)?;
    }
    Ok(())
}
