//! NAPIC 2024 district housing figures and the deficit ranking
//!
//! The table is a compiled-in mock of the published district summary. It is
//! read-only for the life of the process.

/// One district's supply/demand summary
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictRecord {
    pub district: &'static str,
    pub state: &'static str,
    /// Housing units supplied
    pub supply: u32,
    /// Housing units demanded
    pub demand: u32,
    /// Supply adequacy relative to demand; lower means a larger deficit
    pub sufficiency_ratio: f64,
}

impl DistrictRecord {
    /// Units short of demand (negative when supply exceeds demand)
    pub fn gap(&self) -> i64 {
        i64::from(self.demand) - i64::from(self.supply)
    }

    /// Sufficiency ratio as a whole percentage, for charting
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sufficiency_percent(&self) -> u64 {
        (self.sufficiency_ratio.max(0.0) * 100.0).round() as u64
    }
}

const fn district(
    district: &'static str,
    state: &'static str,
    supply: u32,
    demand: u32,
    sufficiency_ratio: f64,
) -> DistrictRecord {
    DistrictRecord {
        district,
        state,
        supply,
        demand,
        sufficiency_ratio,
    }
}

static NAPIC_2024: [DistrictRecord; 13] = [
    district("PETALING", "Selangor", 18_450, 41_200, 0.45),
    district("HULU LANGAT", "Selangor", 12_300, 29_800, 0.41),
    district("KLANG", "Selangor", 14_900, 24_100, 0.62),
    district("GOMBAK", "Selangor", 7_850, 19_600, 0.40),
    district("JOHOR BAHRU", "Johor", 31_200, 36_900, 0.85),
    district("KINTA", "Perak", 9_700, 8_900, 1.09),
    district("TIMUR LAUT", "Pulau Pinang", 6_100, 17_300, 0.35),
    district("BARAT DAYA", "Pulau Pinang", 5_400, 9_800, 0.55),
    district("SEREMBAN", "Negeri Sembilan", 11_600, 10_200, 1.14),
    district("KUANTAN", "Pahang", 6_900, 7_400, 0.93),
    district("KOTA KINABALU", "Sabah", 4_200, 13_700, 0.31),
    district("KUCHING", "Sarawak", 8_300, 9_100, 0.91),
    district("WP KUALA LUMPUR", "W.P. Kuala Lumpur", 22_800, 58_400, 0.39),
];

/// The full district table, in publication order
pub fn napic_2024() -> &'static [DistrictRecord] {
    &NAPIC_2024
}

/// The `k` districts with the lowest sufficiency ratio, largest deficit first.
///
/// Ties keep dataset order. `k` past the end of the table returns every record.
pub fn top_deficit(records: &[DistrictRecord], k: usize) -> Vec<&DistrictRecord> {
    let mut ranked: Vec<&DistrictRecord> = records.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| a.sufficiency_ratio.total_cmp(&b.sufficiency_ratio));
    ranked.truncate(k);
    ranked
}
