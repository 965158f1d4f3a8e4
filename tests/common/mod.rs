mod app;
mod factory;
mod failing_store;

pub use app::*;
pub use factory::*;
pub use failing_store::*;
