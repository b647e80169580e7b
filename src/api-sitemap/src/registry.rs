use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use core_sitemap::RouteTable;
use data_model_sitemap::models::RouteDescriptor;

/// Live table of the routes an application serves.
///
/// Clones share the same table, so routes registered after the sitemap
/// endpoint was built still show up on the next request.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Arc<RwLock<Vec<RouteDescriptor>>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, route: RouteDescriptor) {
        tracing::debug!(method = %route.method, path = %route.path, "Registered route");
        self.write().push(route);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Writers only push, so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Vec<RouteDescriptor>> {
        self.routes.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<RouteDescriptor>> {
        self.routes.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RouteTable for RouteRegistry {
    fn table(&self) -> Vec<RouteDescriptor> {
        self.read().clone()
    }
}
