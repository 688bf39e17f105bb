// Canonical column layouts for the three weekly file kinds.
// Human-readable source names exist only for lookup convenience; the loader
// maps columns by position, never by header text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Candle,
    AggTrade,
    VolumeProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    Text,
}

/// One column of a record kind: its human-readable source name, the canonical
/// short key it is normalized to, and its semantic type.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub key: &'static str,
    pub ty: FieldType,
}

/// Canonical key of the candle open-time column, rewritten in place after load.
pub const OPEN_TIME_KEY: &str = "ots";

const fn field(name: &'static str, key: &'static str, ty: FieldType) -> Field {
    Field { name, key, ty }
}

const CANDLE_FIELDS: &[Field] = &[
    field("openTime", "ots", FieldType::Integer),
    field("open", "open", FieldType::Float),
    field("high", "high", FieldType::Float),
    field("low", "low", FieldType::Float),
    field("close", "close", FieldType::Float),
    field("volume", "vol", FieldType::Float),
    field("closeTime", "cts", FieldType::Integer),
    field("quoteAssetVol", "qav", FieldType::Float),
    field("numberOfTrades", "not", FieldType::Integer),
    field("takerBuyBaseAssetVol", "tbbav", FieldType::Float),
    field("takerBuyQuoteAssetVol", "tbqav", FieldType::Float),
    field("ignore", "ignore", FieldType::Text),
    field("calendarWeek", "cw", FieldType::Integer),
];

const AGG_TRADE_FIELDS: &[Field] = &[
    field("aggTradeId", "atid", FieldType::Integer),
    field("price", "px", FieldType::Float),
    field("quantity", "qx", FieldType::Float),
    field("firstTradeId", "ftid", FieldType::Integer),
    field("lastTradeId", "ltid", FieldType::Integer),
    field("timestamp", "ts", FieldType::Integer),
    field("buyerMaker", "bm", FieldType::Text),
    field("bestTradPriceMatch", "btpm", FieldType::Text),
];

const VOLUME_PROFILE_FIELDS: &[Field] = &[
    field("price", "px", FieldType::Float),
    field("quantity", "qx", FieldType::Float),
];

/// Immutable lookup table over the three record kinds. Built once at startup
/// and passed explicitly to the loader so the loader stays testable in
/// isolation; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    candle: &'static [Field],
    agg_trade: &'static [Field],
    volume_profile: &'static [Field],
}

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry {
            candle: CANDLE_FIELDS,
            agg_trade: AGG_TRADE_FIELDS,
            volume_profile: VOLUME_PROFILE_FIELDS,
        }
    }

    /// Ordered field list for a record kind.
    pub fn fields(&self, kind: RecordKind) -> &'static [Field] {
        match kind {
            RecordKind::Candle => self.candle,
            RecordKind::AggTrade => self.agg_trade,
            RecordKind::VolumeProfile => self.volume_profile,
        }
    }

    /// Ordered canonical key list for a record kind.
    pub fn keys(&self, kind: RecordKind) -> impl Iterator<Item = &'static str> + '_ {
        self.fields(kind).iter().map(|f| f.key)
    }

    /// Resolves a human-readable source name to its canonical key.
    pub fn key_for(&self, kind: RecordKind, name: &str) -> Option<&'static str> {
        self.fields(kind).iter().find(|f| f.name == name).map(|f| f.key)
    }

    pub fn field_count(&self, kind: RecordKind) -> usize {
        self.fields(kind).len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
