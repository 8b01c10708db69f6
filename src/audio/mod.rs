pub mod levels;
pub mod smoother;
