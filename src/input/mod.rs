pub mod events;
pub mod guard;
