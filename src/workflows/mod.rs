pub mod case;
pub mod roster;
