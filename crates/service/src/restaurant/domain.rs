use serde::{Deserialize, Deserializer, Serialize};

/// Restaurant as returned to clients, children included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: i32,
    pub menus: Vec<Menu>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: i64,
    pub dish: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub payment_type: String,
}

/// One row of the menu-count report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCount {
    pub restaurant_id: i64,
    pub name: String,
    pub count: i64,
}

/// Request body for create, full replace and partial merge.
///
/// Every field may be omitted on the wire; which omissions are legal depends
/// on the operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub menus: Vec<MenuInput>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payments: Vec<PaymentRef>,
}

/// An explicit `null` collection reads the same as an omitted one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dish/price pair; any client-sent menu id is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuInput {
    pub dish: String,
    pub price: f64,
}

/// Reference to an existing payment by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRef {
    pub id: i64,
}

/// What the storage layer persists in one transaction.
///
/// `id == 0` inserts a new record. `None` children keep whatever the record
/// already has; `Some` replaces them wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantWrite {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: i32,
    pub menus: Option<Vec<MenuInput>>,
    pub payments: Option<Vec<Payment>>,
}

impl RestaurantWrite {
    /// Scalars copied from a stored record, children left untouched.
    pub fn from_existing(existing: &Restaurant) -> Self {
        Self {
            id: existing.id,
            name: existing.name.clone(),
            address: existing.address.clone(),
            city: existing.city.clone(),
            state: existing.state.clone(),
            telephone: existing.telephone.clone(),
            seat_capacity: existing.seat_capacity,
            menus: None,
            payments: None,
        }
    }
}

impl RestaurantInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_missing_collections() {
        let input: RestaurantInput = serde_json::from_str(r#"{"name":"Supreme Eats","state":"CO"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Supreme Eats"));
        assert!(input.seat_capacity.is_none());
        assert!(input.menus.is_empty());
        assert!(input.payments.is_empty());
    }

    #[test]
    fn null_collections_read_as_absent() {
        let input: RestaurantInput =
            serde_json::from_str(r#"{"name":"Apple","menus":null,"payments":null}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("Apple"));
        assert!(input.menus.is_empty());
        assert!(input.payments.is_empty());
    }

    #[test]
    fn input_ignores_client_ids_and_payment_types() {
        let input: RestaurantInput = serde_json::from_str(
            r#"{"id":77,"name":"A","seat_capacity":0,
                "menus":[{"id":5,"dish":"Burger","price":9.99}],
                "payments":[{"id":2,"payment_type":"Cash"}]}"#,
        )
        .unwrap();
        assert_eq!(input.seat_capacity, Some(0));
        assert_eq!(input.menus, vec![MenuInput { dish: "Burger".into(), price: 9.99 }]);
        assert_eq!(input.payments, vec![PaymentRef { id: 2 }]);
    }
}
