pub mod attendance;
pub mod events;
pub mod feedback;
pub mod index;
pub mod login;
pub mod logout;
