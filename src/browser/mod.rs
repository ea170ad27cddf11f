pub mod connection;
pub mod headless;
pub mod session;

pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;
pub use session::BrowserSession;
