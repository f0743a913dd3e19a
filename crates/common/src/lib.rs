//! Shared helpers for the pet shop workspace: logging bootstrap,
//! environment checks and small wire types used by more than one crate.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn liveness_message_is_stable() {
        assert_eq!(types::LIVENESS_MESSAGE, "Pet-shop server is live");
    }
}
