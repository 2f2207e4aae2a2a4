pub mod expand;
pub mod generate;
pub mod verify;
