mod models;
mod name;
mod ocr;
mod rename;
mod session;

pub use models::run_models;
pub use name::run_name;
pub use ocr::run_ocr;
pub use rename::run_rename;
pub use session::run_session;
