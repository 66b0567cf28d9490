//! HTTP routes.

pub mod auth;
pub mod health;
pub mod relay;
pub mod webhook;

pub use auth::{CallbackParams, callback_handler, start_handler};
pub use health::health_routes;
pub use relay::{
    CueRequest, PredictionResponse, cue_log_handler, post_cue_handler, take_cue_handler,
    take_prediction_handler,
};
pub use webhook::webhook_handler;
