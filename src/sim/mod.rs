//! Frame simulation module
//!
//! All gameplay logic lives here. This module must stay host-independent:
//! - Driven only by the caller's per-frame `dt`, never its own timers
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage calls; effects go out as `GameEvent`s

pub mod camera;
pub mod collision;
pub mod droppings;
pub mod movement;
pub mod rabbit;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::{CameraPose, follow};
pub use collision::{ProximityReport, resolve_proximity, within};
pub use droppings::DroppingField;
pub use movement::integrate;
pub use rabbit::{RabbitAi, RabbitMode};
pub use session::{Session, sanitize_player_name};
pub use snapshot::{ActorView, DroppingView, FrameSnapshot};
pub use state::{Actor, Collectible, GameEvent, GamePhase, GameState};
pub use tick::{MAX_FRAME_DT, TickInput, tick};
