mod animation;
mod error;
mod session;

pub use animation::{AnimationState, TimeControl};
pub use error::SessionError;
pub use session::{
    spawn_risk_query, SelectedStatus, Selection, SelectionTicket, Session, SessionStatus,
};
