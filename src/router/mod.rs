pub mod debounce;
pub mod event_router;
pub mod router_model;
