use serde::Serialize;

/// Plain-text body returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Pet-shop server is live";

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
