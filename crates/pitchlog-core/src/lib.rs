// Library root: pitch geometry, the formation registry, the expected-value
// model, event capture state, and the persistence around them.

pub mod config;
pub mod db;
pub mod events;
pub mod formation;
pub mod notify;
pub mod pitch;
pub mod pointer;
pub mod selection;
pub mod session;
pub mod xmodel;
