//! Pieces shared by the server binary and the `server` crate.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        assert_eq!(serde_json::to_value(&h).unwrap()["status"], "ok");
    }
}
