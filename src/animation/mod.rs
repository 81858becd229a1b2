pub mod ease;
pub mod keyframes;
