pub mod controller;
pub mod gate;
pub(crate) mod recording;
pub mod review;
