pub mod config;
pub mod domain {
    pub mod payment;
    pub mod processor;
}
pub mod circuit {
    pub mod state;
    pub mod store;
    pub mod store_redis;
    pub mod transitions;
}
pub mod processors;
pub mod accounting {
    pub mod store;
    pub mod store_redis;
    pub mod summary;
}
pub mod queue {
    pub mod work_queue;
    pub mod worker_pool;
}
pub mod router {
    pub mod failover;
}
pub mod monitor {
    pub mod health;
}
pub mod http {
    pub mod handlers {
        pub mod payments;
        pub mod summary;
    }
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub queue: queue::work_queue::WorkQueue,
    pub accounting: Arc<dyn accounting::store::AccountingStore>,
}
