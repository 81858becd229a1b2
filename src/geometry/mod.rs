pub mod layout;
pub mod vertex;
