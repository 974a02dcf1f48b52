//! Stream kinds served by the Criteo Marketing API
//!
//! Every stream id resolves to a `StreamKind` once, before any sync work
//! starts. The runner dispatches on the variant.

use crate::catalog::metadata::IGNORE_CROSS_DEVICE;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::fmt;

/// Report types served by the statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    CampaignPerformance,
    FacebookDpa,
    TransactionId,
}

impl ReportType {
    /// All statistics report types, in discovery order
    pub const ALL: [ReportType; 3] = [
        ReportType::CampaignPerformance,
        ReportType::FacebookDpa,
        ReportType::TransactionId,
    ];

    /// Stream id and API report type name
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::CampaignPerformance => "CampaignPerformance",
            ReportType::FacebookDpa => "FacebookDPA",
            ReportType::TransactionId => "TransactionID",
        }
    }

    /// Resolve a report type from a stream id
    pub fn from_stream_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == id)
    }

    /// Stream-level metadata this report type overrides at discovery.
    ///
    /// `TransactionID` needs the cross-device flag sent as an explicit null
    /// to return all transactions.
    pub fn root_metadata_overrides(self) -> Vec<(&'static str, JsonValue)> {
        match self {
            ReportType::TransactionId => vec![(IGNORE_CROSS_DEVICE, JsonValue::Null)],
            ReportType::CampaignPerformance | ReportType::FacebookDpa => Vec::new(),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report types served by the seller statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SellerStatsReport {
    CampaignStats,
    SellerCampaignStats,
    SellerStats,
}

impl SellerStatsReport {
    /// All seller statistics report types
    pub const ALL: [SellerStatsReport; 3] = [
        SellerStatsReport::CampaignStats,
        SellerStatsReport::SellerCampaignStats,
        SellerStatsReport::SellerStats,
    ];

    /// Stream id
    pub fn as_str(self) -> &'static str {
        match self {
            SellerStatsReport::CampaignStats => "CampaignStats",
            SellerStatsReport::SellerCampaignStats => "SellerCampaignStats",
            SellerStatsReport::SellerStats => "SellerStats",
        }
    }
}

/// How a stream is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Day-windowed statistics report with attribution catch-up
    Statistics(ReportType),
    /// Seller statistics report; recognized but not extracted
    SellerStats(SellerStatsReport),
}

impl StreamKind {
    /// Resolve the kind of a stream id
    pub fn resolve(stream_id: &str) -> Result<Self> {
        if let Some(report) = ReportType::from_stream_id(stream_id) {
            return Ok(StreamKind::Statistics(report));
        }
        SellerStatsReport::ALL
            .into_iter()
            .find(|r| r.as_str() == stream_id)
            .map(StreamKind::SellerStats)
            .ok_or_else(|| Error::UnrecognizedStream {
                stream: stream_id.to_string(),
            })
    }
}
