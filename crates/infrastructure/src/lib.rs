pub mod in_memory;
pub mod models;
pub mod repositories;
pub mod supabase;

pub use in_memory::*;
pub use models::*;
pub use repositories::*;
pub use supabase::*;
