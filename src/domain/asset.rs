//! Market snapshot of a single asset.

/// Point-in-time market attributes for one asset, as reported by the
/// provider. Produced fresh each refresh cycle; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSnapshot {
    /// Provider-unique identifier, e.g. "bitcoin".
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub ath: f64,
    pub atl: f64,
    pub change_24h_pct: f64,
    pub market_cap_rank: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_fields() {
        let snap = AssetSnapshot {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "btc".into(),
            current_price: 50_000.0,
            ath: 69_000.0,
            atl: 67.81,
            change_24h_pct: -1.2,
            market_cap_rank: 1,
        };
        assert_eq!(snap.id, "bitcoin");
        assert_eq!(snap.market_cap_rank, 1);
        assert!(snap.atl < snap.current_price && snap.current_price < snap.ath);
    }
}
