pub mod chunk_ops;
pub mod record_ops;
