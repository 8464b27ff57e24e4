pub mod classifier;
pub mod config;
pub mod domain {
    pub mod amount;
    pub mod event;
    pub mod processor;
    pub mod session;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod sessions;
    }
    pub mod middleware {
        pub mod webhook_auth;
    }
    pub mod routes;
}
pub mod receipt;
pub mod service {
    pub mod actions;
    pub mod error_classifier;
    pub mod response;
    pub mod session_service;
}
pub mod validation;

use config::AppConfig;
use gateways::mock::{MockBehavior, MockGateway};
use gateways::razorpay::RazorpayGateway;
use gateways::ProcessorGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session_service: service::session_service::SessionService,
}

pub fn build_gateway(cfg: &AppConfig) -> anyhow::Result<Arc<dyn ProcessorGateway>> {
    if cfg.uses_mock_processor() {
        return Ok(Arc::new(MockGateway::new(MockBehavior::parse(&cfg.mock_behavior))));
    }
    Ok(Arc::new(RazorpayGateway::new(&cfg.razorpay)?))
}

pub fn build_state(cfg: &AppConfig, gateway: Arc<dyn ProcessorGateway>) -> AppState {
    AppState {
        session_service: service::session_service::SessionService {
            gateway,
            default_currency: cfg.default_currency.clone(),
            dashboard_base_url: cfg.dashboard_base_url.clone(),
            key_id: cfg.razorpay.key_id.clone(),
        },
    }
}
