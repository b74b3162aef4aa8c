use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub detail: Option<String> }

#[derive(ToSchema)]
pub struct MenuDoc { pub id: i64, pub dish: String, pub price: f64 }

#[derive(ToSchema)]
pub struct PaymentDoc { pub id: i64, pub payment_type: String }

#[derive(ToSchema)]
pub struct RestaurantDoc {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: i32,
    pub menus: Vec<MenuDoc>,
    pub payments: Vec<PaymentDoc>,
}

#[derive(ToSchema)]
pub struct MenuCountDoc { pub restaurant_id: i64, pub name: String, pub count: i64 }

#[derive(ToSchema)]
pub struct MenuInputDoc { pub dish: String, pub price: f64 }

#[derive(ToSchema)]
pub struct PaymentRefDoc { pub id: i64 }

/// Write body; omitted fields are cleared by PUT and kept by PATCH.
#[derive(ToSchema)]
pub struct RestaurantInputDoc {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: Option<i32>,
    pub menus: Option<Vec<MenuInputDoc>>,
    pub payments: Option<Vec<PaymentRefDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::restaurants::list,
        crate::routes::restaurants::get_by_id,
        crate::routes::restaurants::get_by_name,
        crate::routes::restaurants::by_state,
        crate::routes::restaurants::like_name,
        crate::routes::restaurants::like_dish,
        crate::routes::restaurants::menu_counts,
        crate::routes::restaurants::create,
        crate::routes::restaurants::replace,
        crate::routes::restaurants::merge,
        crate::routes::restaurants::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            MenuDoc,
            PaymentDoc,
            RestaurantDoc,
            MenuCountDoc,
            MenuInputDoc,
            PaymentRefDoc,
            RestaurantInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "restaurants")
    )
)]
pub struct ApiDoc;
