//! Deterministic game simulation
//!
//! Pure state machines with no rendering or platform dependencies. The
//! [`session::GameSession`] ties them together; the submodules are usable
//! on their own for testing and tooling.

pub mod clock;
pub mod collect;
pub mod movement;
pub mod player;
pub mod session;
pub mod turn;

pub use clock::{ClockPhase, GameClock, TickOutcome};
pub use collect::{Collectible, CollectibleManager, CollectibleState, CollectedEvent};
pub use movement::{MovementController, StepOutcome};
pub use player::{MovementState, Player};
pub use session::{FrameSnapshot, GameSession, SessionEvent};
pub use turn::{TurnAnimation, TurnPose};
