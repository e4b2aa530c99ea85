/// Token totals derived from a session transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenMetrics {
    pub input: u64,
    pub output: u64,
    /// cache reads + cache creation
    pub cached: u64,
    pub total: u64,
    /// Input-side tokens of the most recent main-chain message
    pub context_length: u64,
}
