pub mod history;
pub mod input;
pub mod interaction;
pub mod selection;
pub mod shortcuts;
pub mod store;

pub use history::{History, Snapshot};
pub use input::{HandleTarget, InputEvent, Modifiers};
pub use interaction::{InteractionController, Mode};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{ListenerId, SceneStore, StoreEvent};
