pub mod catalog;
pub mod loader;
pub mod plan;
pub mod schema;

pub use catalog::load_block_catalog;
pub use loader::DataLoadError;
pub use plan::{load_plan, load_plan_dir};
