pub mod buffer;
pub mod engine;
pub mod key;
pub mod macros;
pub mod modes;
pub mod motions;
pub mod object;
pub mod operators;
pub mod registers;
pub mod registry;
pub mod state;
pub mod text_objects;
pub mod traits;
pub mod types;

pub use crate::buffer::StringBuffer;
pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot, install};
pub use crate::key::{InputEvent, Key, KeyCode, KeyEvent, Modifiers};
pub use crate::motions::register_motion;
pub use crate::object::{TextObject, TextObjectKind};
pub use crate::operators::register_operator;
pub use crate::registers::{RegisterContents, RegisterFile, is_register_id};
pub use crate::registry::{Condition, Context, Motion, Operator, Pattern, Registry};
pub use crate::state::{CharacterFind, CountBuffer, ModeState, PendingOperator, Recording};
pub use crate::text_objects::register_text_object;
pub use crate::traits::{Buffer, Clipboard, Digraphs, Document, NoDigraphs};
pub use crate::types::{DispatchResult, Mode, SelectionKind};

#[cfg(feature = "clipboard")]
pub use crate::registers::SystemClipboard;
