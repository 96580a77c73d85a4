use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Identifier for a monitored chain health dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Latest block number seen on the chain
    BlockHeight,
    /// ETH balance of the sequencer account
    SequencerBalance,
    /// Seconds since the last settlement batch was posted
    LastBatchAge,
    /// Cumulative transaction count
    TxCount,
    /// Active addresses observed over the sampling period
    ActiveAddresses,
    /// Total value locked in the protocol
    ProtocolTvl,
    /// Protocol transfer volume over the sampling period
    ProtocolVolume,
    /// Network gas price in gwei
    GasPriceGwei,
    /// Connected peer count reported by the node
    PeerCount,
}

impl MetricKey {
    /// All known keys, in display order
    pub const ALL: [MetricKey; 9] = [
        MetricKey::BlockHeight,
        MetricKey::SequencerBalance,
        MetricKey::LastBatchAge,
        MetricKey::TxCount,
        MetricKey::ActiveAddresses,
        MetricKey::ProtocolTvl,
        MetricKey::ProtocolVolume,
        MetricKey::GasPriceGwei,
        MetricKey::PeerCount,
    ];

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::BlockHeight => "block_height",
            MetricKey::SequencerBalance => "sequencer_balance",
            MetricKey::LastBatchAge => "last_batch_age",
            MetricKey::TxCount => "tx_count",
            MetricKey::ActiveAddresses => "active_addresses",
            MetricKey::ProtocolTvl => "protocol_tvl",
            MetricKey::ProtocolVolume => "protocol_volume",
            MetricKey::GasPriceGwei => "gas_price_gwei",
            MetricKey::PeerCount => "peer_count",
        }
    }

    /// Whether negative observations are invalid for this key.
    ///
    /// Every current vital is a count, a balance or an age.
    pub fn is_non_negative(&self) -> bool {
        true
    }

    /// Whether this key is a monotonically increasing counter.
    ///
    /// Windowed rates over a cumulative key are computed as a delta
    /// rather than a sample count.
    pub fn is_cumulative(&self) -> bool {
        matches!(self, MetricKey::BlockHeight | MetricKey::TxCount)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for metric key names that are not part of the known set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown metric key: {0}")]
pub struct UnknownMetricKey(pub String);

impl FromStr for MetricKey {
    type Err = UnknownMetricKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownMetricKey(s.to_string()))
    }
}

/// One immutable observation of a chain vital
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Which vital was observed
    pub key: MetricKey,
    /// Observed value
    pub value: f64,
    /// When the observation was made by the producer
    pub observed_at: SystemTime,
}

impl MetricSample {
    /// Create a new sample
    pub fn new(key: MetricKey, value: f64, observed_at: SystemTime) -> Self {
        Self { key, value, observed_at }
    }

    /// Create a sample stamped with a unix timestamp in seconds
    pub fn at_unix_secs(key: MetricKey, value: f64, secs: u64) -> Self {
        Self::new(key, value, UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Observation time as seconds since the unix epoch
    pub fn observed_at_unix_secs(&self) -> u64 {
        self.observed_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
