pub mod lenient;
pub mod pagination;
