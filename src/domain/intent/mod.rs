pub mod intent;

pub use intent::{Intent, IntentType, IntentValue};
