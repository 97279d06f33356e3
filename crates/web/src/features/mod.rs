pub mod proxy;
pub mod winners;
