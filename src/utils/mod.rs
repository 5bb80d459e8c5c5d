pub mod roster_cache;
pub mod seed;
