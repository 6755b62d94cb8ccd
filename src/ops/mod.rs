pub mod adjust;
pub mod crop;
pub mod paint;
pub mod text;
pub mod transform;
