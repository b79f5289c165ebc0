#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod animation;
pub mod board;
pub mod client;
pub mod coord;
pub mod display;
pub mod protocol;
pub mod scheduler;
pub mod session;
pub mod side;
pub mod timing;
