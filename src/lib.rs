pub mod analysis;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod hyperliquid;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

use crate::analysis::TradeAnalyzer;
use crate::config::AppConfig;
use crate::store::TradeStore;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: TradeAnalyzer<dyn TradeStore>,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
