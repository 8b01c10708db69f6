pub mod preview;
pub mod ray_gradient;
