pub mod date_handling;
pub mod env_security;
pub mod http;
pub mod path_processing;
pub mod secret_scan;
pub mod text_processing;

pub use date_handling::*;
pub use env_security::*;
pub use path_processing::*;
pub use secret_scan::*;
pub use text_processing::*;
