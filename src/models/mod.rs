pub mod block;
pub mod item;
pub mod message;
pub mod settings;
pub mod status;
pub mod tokens;

pub use block::BlockMetrics;
pub use item::{ItemKind, MergeMode, WidgetItem, WidgetKind, FLEX_SEPARATOR, SEPARATOR};
pub use message::{MessageUsage, TranscriptLine};
pub use settings::{FlexMode, PowerlineSettings, Settings};
pub use status::StatusJson;
pub use tokens::TokenMetrics;
