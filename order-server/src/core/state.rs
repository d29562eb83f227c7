//! Server state

use std::sync::Arc;

use crate::core::Config;
use crate::db::MemoryStore;
use crate::pricing::{PricingPolicy, VoucherCatalog};

/// Server state - shared handles for every request
///
/// Cloning is cheap: the store and the read-only lookup objects are
/// behind `Arc`s. The pricing policy and voucher catalog are built once
/// at startup and never mutated afterwards.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Transactional store
    pub store: MemoryStore,
    /// Pricing policy (read-only)
    pub pricing: Arc<PricingPolicy>,
    /// Voucher catalog (read-only)
    pub vouchers: Arc<VoucherCatalog>,
}

impl ServerState {
    /// Initialize server state: build the pricing policy from config,
    /// load the static voucher catalog and seed the store with demo data
    pub async fn initialize(config: &Config) -> Self {
        let store = MemoryStore::new();
        crate::db::seed::load_demo_data(&store).await;

        Self {
            config: config.clone(),
            store,
            pricing: Arc::new(PricingPolicy::from_config(config)),
            vouchers: Arc::new(VoucherCatalog::with_defaults()),
        }
    }

    /// State with an empty store, for tests that seed their own data
    pub fn bare(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: MemoryStore::new(),
            pricing: Arc::new(PricingPolicy::from_config(config)),
            vouchers: Arc::new(VoucherCatalog::with_defaults()),
        }
    }
}
