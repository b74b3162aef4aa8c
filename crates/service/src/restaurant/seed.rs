use tracing::info;

use super::domain::{MenuInput, PaymentRef, RestaurantInput};
use super::repository::RestaurantRepository;
use super::service::RestaurantService;
use crate::errors::ServiceError;

const PAYMENT_TYPES: [&str; 3] = ["Cash", "Credit Card", "Mobile Pay"];

fn dish(name: &str, price: f64) -> MenuInput {
    MenuInput { dish: name.to_string(), price }
}

/// Insert sample payments and restaurants into an empty store.
///
/// Returns the number of restaurants created; a store that already holds
/// restaurants is left alone.
pub async fn seed_sample_data<R: RestaurantRepository + ?Sized>(svc: &RestaurantService<R>) -> Result<usize, ServiceError> {
    if !svc.list().await?.is_empty() {
        info!("seed skipped: restaurants already present");
        return Ok(0);
    }

    let repo = svc.repository();
    let existing = repo.find_all_payments().await?;
    let mut refs = Vec::with_capacity(PAYMENT_TYPES.len());
    for kind in PAYMENT_TYPES {
        let id = match existing.iter().find(|p| p.payment_type == kind) {
            Some(p) => p.id,
            None => repo.create_payment(kind).await?.id,
        };
        refs.push(PaymentRef { id });
    }
    let (cash, credit, mobile) = (refs[0], refs[1], refs[2]);

    let samples = vec![
        RestaurantInput {
            name: Some("Apple".into()),
            address: Some("123 Main Street".into()),
            city: Some("City".into()),
            state: Some("ST".into()),
            telephone: Some("555-555-1234".into()),
            seat_capacity: Some(20),
            menus: vec![
                dish("Mac and Cheese", 6.95),
                dish("Lasagna", 8.50),
                dish("Meatloaf", 7.77),
                dish("Chocolate Cake", 4.50),
            ],
            payments: vec![cash],
        },
        RestaurantInput {
            name: Some("Eagle Cafe".into()),
            address: Some("321 Uptown Drive".into()),
            city: Some("Town".into()),
            state: Some("CT".into()),
            telephone: Some("555-555-2345".into()),
            seat_capacity: Some(30),
            menus: vec![
                dish("Tacos", 10.49),
                dish("Hamburger", 9.99),
                dish("Cheese Cake", 8.99),
            ],
            payments: vec![cash, credit],
        },
        RestaurantInput {
            name: Some("Number 1 Eats".into()),
            address: Some("565 Side Avenue".into()),
            city: Some("Village".into()),
            state: Some("VT".into()),
            telephone: Some("555-123-1555".into()),
            seat_capacity: Some(15),
            menus: vec![
                dish("Pizza", 15.15),
                dish("Spaghetti", 11.95),
                dish("Cheese Sticks", 5.49),
            ],
            payments: vec![cash, credit, mobile],
        },
    ];

    let mut created = 0;
    for input in samples {
        svc.create(input).await?;
        created += 1;
    }
    info!(restaurants = created, "sample data seeded");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::repository::memory::InMemoryRestaurantRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeds_once() {
        let svc = RestaurantService::new(Arc::new(InMemoryRestaurantRepository::new()));
        assert_eq!(seed_sample_data(&svc).await.unwrap(), 3);
        assert_eq!(seed_sample_data(&svc).await.unwrap(), 0);

        let all = svc.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(svc.repository().find_all_payments().await.unwrap().len(), 3);

        let eats = svc.get_by_name("Number 1 Eats").await.unwrap();
        assert_eq!(eats.payments.len(), 3);
        assert_eq!(svc.search_by_dish("cheese").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn reuses_existing_payment_types() {
        let repo = Arc::new(InMemoryRestaurantRepository::new());
        let cash = repo.create_payment("Cash").await.unwrap();
        let svc = RestaurantService::new(repo);
        seed_sample_data(&svc).await.unwrap();

        let payments = svc.repository().find_all_payments().await.unwrap();
        assert_eq!(payments.len(), 3);
        assert_eq!(svc.get_by_name("Apple").await.unwrap().payments, vec![cash]);
    }
}
