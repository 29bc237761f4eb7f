pub mod chronicle_ops;

pub use chronicle_ops::ChronicleOps;
