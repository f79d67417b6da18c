pub mod action;
pub mod ai;
pub mod damage;
pub mod narration;
pub mod rng;
pub mod runner;
pub mod session;
