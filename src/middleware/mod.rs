pub mod session_context;
