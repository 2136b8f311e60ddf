mod component;
mod filter;
mod layout;
mod render;
mod state;

pub use component::NetworkGraph;
