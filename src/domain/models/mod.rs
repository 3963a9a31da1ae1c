pub mod actor;
pub mod callback;
pub mod roster;

pub use actor::{Actor, Role};
pub use callback::{CallbackRequest, CallbackStatus, NewCallbackRequest};
pub use roster::{Student, Teacher};
