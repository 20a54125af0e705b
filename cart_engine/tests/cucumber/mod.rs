mod cart_world;
mod setups;

pub use cart_world::CartWorld;
