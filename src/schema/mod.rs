pub mod ddl;
pub mod dependencies;
pub mod manager;
pub mod tables;
pub mod types;

pub use ddl::*;
pub use dependencies::*;
pub use manager::*;
pub use tables::*;
pub use types::*;
