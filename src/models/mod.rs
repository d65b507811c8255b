pub mod communication;
pub mod country;
pub mod game;
pub mod lobby;
pub mod score;
