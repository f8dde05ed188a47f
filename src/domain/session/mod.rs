pub mod session_controller;
pub mod stream_session;

pub use session_controller::{SessionController, SessionEvent, SessionTable};
pub use stream_session::StreamSession;
