#[derive(Clone, Debug)]
pub struct RazorpayConfig {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub processor_adapter: String,
    pub razorpay: RazorpayConfig,
    pub default_currency: String,
    pub dashboard_base_url: String,
    pub webhook_secret: Option<String>,
    pub mock_behavior: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            processor_adapter: std::env::var("PROCESSOR_ADAPTER")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|_| "RAZORPAY".to_string()),
            razorpay: RazorpayConfig {
                base_url: std::env::var("RAZORPAY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
                key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
                key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
                timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok()),
            },
            default_currency: std::env::var("DEFAULT_CURRENCY")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|_| "INR".to_string()),
            dashboard_base_url: std::env::var("DASHBOARD_BASE_URL")
                .unwrap_or_else(|_| "https://dashboard.razorpay.com/app".to_string()),
            webhook_secret: std::env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            mock_behavior: std::env::var("MOCK_BEHAVIOR")
                .unwrap_or_else(|_| "ALWAYS_SUCCESS".to_string()),
        }
    }

    pub fn uses_mock_processor(&self) -> bool {
        self.processor_adapter == "MOCK"
    }
}
