pub mod db;
pub mod memory;

pub use db::PgProfileSource;
pub use memory::InMemoryProfileSource;
