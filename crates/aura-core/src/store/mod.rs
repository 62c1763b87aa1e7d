// ── Per-provider state ──
//
// Each provider owns one `ProviderSlice`, held in its own `watch` channel.
// Transitions are methods on the slice so the view can apply them inside
// atomic `send_modify` / `send_if_modified` closures.

mod slice;

pub use slice::{AuthCheck, FetchState, ItemList, ProviderSlice};
