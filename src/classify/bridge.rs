/// Contig bridge evidence (supported_bridges.csv generation)
///
/// Format (3 comma-separated columns, no header):
/// 1. first contig (lexicographically smaller id)
/// 2. second contig
/// 3. number of read pairs supporting the bridge
use crate::error::Error;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Minimum number of supporting pairs for a bridge to be reported.
pub const MIN_BRIDGE_SUPPORT: u32 = 2;

/// Unordered pair of contig ids, stored in lexicographic order.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub struct BridgeKey {
    first: String,
    second: String,
}

impl BridgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for BridgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<>{}", self.first, self.second)
    }
}

/// A bridge with enough support to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedBridge {
    pub key: BridgeKey,
    pub count: u32,
}

/// Support counts for candidate contig joins.
#[derive(Debug, Default, Clone)]
pub struct BridgeLedger {
    counts: HashMap<BridgeKey, u32>,
}

impl BridgeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one supporting pair for the join between `a` and `b`.
    pub fn record(&mut self, a: &str, b: &str) {
        *self.counts.entry(BridgeKey::new(a, b)).or_insert(0) += 1;
    }

    /// Current support for the join between `a` and `b`, in either order.
    pub fn count(&self, a: &str, b: &str) -> u32 {
        self.counts.get(&BridgeKey::new(a, b)).copied().unwrap_or(0)
    }

    /// Number of distinct candidate joins seen, supported or not.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bridges with at least [`MIN_BRIDGE_SUPPORT`] pairs, sorted by key.
    pub fn finalize(&self) -> Vec<SupportedBridge> {
        let mut bridges: Vec<SupportedBridge> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count >= MIN_BRIDGE_SUPPORT)
            .map(|(key, &count)| SupportedBridge {
                key: key.clone(),
                count,
            })
            .collect();

        bridges.sort_by(|a, b| a.key.cmp(&b.key));
        bridges
    }

    /// Write the supported bridges to `output_path` and return how many
    /// were written.
    pub fn persist(&self, output_path: &Path) -> Result<usize, Error> {
        let file = File::create(output_path).map_err(|e| Error::io(e, output_path))?;
        let mut writer = BufWriter::new(file);

        let bridges = self.finalize();
        for bridge in &bridges {
            writeln!(
                writer,
                "{},{},{}",
                bridge.key.first(),
                bridge.key.second(),
                bridge.count
            )
            .map_err(|e| Error::io(e, output_path))?;
        }
        writer.flush().map_err(|e| Error::io(e, output_path))?;

        log::info!(
            "Wrote {} supported bridges ({} candidates) to {}",
            bridges.len(),
            self.len(),
            output_path.display()
        );
        Ok(bridges.len())
    }
}
