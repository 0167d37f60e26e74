pub mod block;
pub mod classroom;
pub mod session;
pub mod settings;

pub use block::Block;
pub use classroom::Classroom;
pub use session::Session;
pub use settings::{RejectReason, SettingKey, SettingOutcome, Settings};
