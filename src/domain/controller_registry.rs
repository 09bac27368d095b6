use crate::domain::controller::Controller;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

static CONTROLLER_REGISTRY: LazyLock<RwLock<HashMap<String, Arc<dyn Controller>>>> = LazyLock::new(|| RwLock::new(HashMap::new()));

pub fn register(controller: Arc<dyn Controller>) {
    CONTROLLER_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(controller.id().to_string(), controller);
}

pub fn get(controller_id: &str) -> Option<Arc<dyn Controller>> {
    CONTROLLER_REGISTRY.read().unwrap_or_else(PoisonError::into_inner).get(controller_id).cloned()
}
