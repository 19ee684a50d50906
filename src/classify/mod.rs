pub mod bridge;
pub mod pair;
pub mod stream;

pub use bridge::{BridgeKey, BridgeLedger, SupportedBridge};
pub use pair::{Branch, PairClassifier, PairOutcome, Verdict};
pub use stream::{StreamSummary, Termination};
