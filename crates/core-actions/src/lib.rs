//! Modal command engine.
//!
//! `ModeOrchestrator` is the public entry point: the shell feeds it one
//! `KeyEvent` at a time and renders from its accessors. Beneath it:
//! * `handlers`      - one `ModeHandler` per mode family
//! * `operator`      - delete / change / yank / paste over a `TextRange`
//! * `span_resolver` - operator + motion → `TextRange` (inclusivity rules)
//! * `search`        - pattern state, match cache, wrapping search
//! * `indent`        - shift and join helpers shared by Normal and Visual
//!
//! Everything here runs synchronously on the caller's thread; no state is
//! retained between keys except what the orchestrator owns.

pub mod context;
pub mod handlers;
pub mod indent;
pub mod operator;
pub mod orchestrator;
pub mod search;
pub mod span_resolver;

pub use context::{EditContext, HandlerResult, READONLY_MESSAGE, Transition};
pub use handlers::ModeHandler;
pub use handlers::normal::{NEWEST_CHANGE, NO_STRING_UNDER_CURSOR, OLDEST_CHANGE};
pub use operator::{Operator, OperatorKind, OperatorStatus};
pub use orchestrator::{DispatchResult, ModeOrchestrator};
pub use search::{
    NO_PREVIOUS_PATTERN, SearchOutcome, SearchState, WRAPPED_TO_BOTTOM, WRAPPED_TO_TOP,
};
pub use span_resolver::{OperatorMotion, TextRange};
