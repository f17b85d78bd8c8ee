pub mod gate;

pub use gate::{AuthGate, HEADER_FAKE_ROLE, HEADER_FAKE_USER_ADDR};
