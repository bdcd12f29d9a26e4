pub mod cues;
pub mod level;
pub mod rng;
pub mod script;
pub mod session;
pub mod storage;
