pub mod booking;
pub mod editor;
pub mod gesture;
pub mod reconcile;
pub mod session;
pub mod transfer;
