//! Per-IP limits. Guesses may hit the judge, so they get the tighter one;
//! health checks are not limited.

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// 30 guesses per 60 seconds per IP.
pub fn guess_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 30).real_ip_key()
}

/// 120 requests per 60 seconds per IP for the rest of the API.
pub fn api_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 120).real_ip_key()
}
