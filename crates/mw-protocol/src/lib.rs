pub mod analysis;
pub mod api;
pub mod menu;
pub mod preferences;

pub use analysis::*;
pub use api::*;
pub use menu::*;
pub use preferences::*;
