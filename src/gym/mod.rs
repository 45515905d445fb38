pub mod base;

pub use base::{ActionSpace, EnvStatus, Environment, ObservationSpace, Step};
