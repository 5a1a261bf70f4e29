pub mod market;
pub mod stroke;
pub mod viewport;
