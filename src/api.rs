//! The estimator's HTTP surface.
//!
//! | Method | Path | Body in | Body out |
//! |---|---|---|---|
//! | `GET` | `/` | none | `{"message": "..."}` |
//! | `POST` | `/carPriceEstimator` | [`CarQuote`] | JSON number |
//! | `GET` | `/healthz`, `/readyz` | none | plain text |

use serde::{Deserialize, Serialize};

use crate::estimator::{CarQuote, estimate_price};
use crate::health;
use crate::json::{Json, JsonRejection};
use crate::request::Request;
use crate::router::Router;

/// Served by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to Car Price Estimator API";

pub const ESTIMATE_PATH: &str = "/carPriceEstimator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}

/// Builds the service's routing table.
pub fn router() -> Router {
    Router::new()
        .get("/", welcome)
        .post(ESTIMATE_PATH, estimate)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

async fn welcome(_req: Request) -> Json<Welcome> {
    Json(Welcome { message: WELCOME_MESSAGE.to_owned() })
}

async fn estimate(req: Request) -> Result<Json<f64>, JsonRejection> {
    let car: CarQuote = req.json()?;
    Ok(Json(estimate_price(&car)))
}
