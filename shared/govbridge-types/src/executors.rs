use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Executor contract flavours a proposal outcome can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutorKind {
    /// Records the outcome only; no transactions.
    Vanilla,
    /// Zodiac-style avatar module executing an ABI-encoded bundle.
    Avatar,
    /// Timelock executor; same payload shape as `Avatar`.
    Timelock,
    /// Starknet executor that relays an execution hash to an L1 executor.
    EthRelayer,
}

impl ExecutorKind {
    pub const ALL: [ExecutorKind; 4] = [
        ExecutorKind::Vanilla,
        ExecutorKind::Avatar,
        ExecutorKind::Timelock,
        ExecutorKind::EthRelayer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorKind::Vanilla => "vanilla",
            ExecutorKind::Avatar => "avatar",
            ExecutorKind::Timelock => "timelock",
            ExecutorKind::EthRelayer => "eth-relayer",
        }
    }

    /// Whether the kind cannot build a payload without a transaction bundle.
    pub fn requires_transactions(&self) -> bool {
        !matches!(self, ExecutorKind::Vanilla)
    }
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownExecutorKind(pub String);

impl fmt::Display for UnknownExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown executor kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownExecutorKind {}

impl FromStr for ExecutorKind {
    type Err = UnknownExecutorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExecutorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownExecutorKind(s.to_string()))
    }
}

/// Calldata shape expected by an executor: its address plus encoded parameters (0x-hex).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayload {
    pub executor: String,
    pub execution_params: Vec<String>,
}
