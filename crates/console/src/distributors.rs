//! List helpers behind the distributor views: filtering and summary figures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use midplat_core::DistributorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributorStatus {
    Pending,
    Active,
    Frozen,
}

/// A distributor row. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributor {
    pub id: DistributorId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub level: u8,
    pub status: DistributorStatus,
    #[serde(default)]
    pub total_commission: i64,
    #[serde(default)]
    pub withdrawable: i64,
    pub joined_at: DateTime<Utc>,
}

/// Criteria from the list's search bar. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributorFilter {
    /// Case-insensitive substring of the name or phone.
    pub keyword: Option<String>,
    pub status: Option<DistributorStatus>,
    pub level: Option<u8>,
}

impl DistributorFilter {
    pub fn matches(&self, d: &Distributor) -> bool {
        let keyword_ok = match self.keyword.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => {
                let k = k.to_lowercase();
                d.name.to_lowercase().contains(&k) || d.phone.contains(&k)
            }
            _ => true,
        };
        keyword_ok
            && self.status.is_none_or(|s| s == d.status)
            && self.level.is_none_or(|l| l == d.level)
    }

    /// Matching rows, in input order.
    pub fn apply<'a>(&self, list: &'a [Distributor]) -> Vec<&'a Distributor> {
        list.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Summary cards above the distributor list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub frozen: usize,
    pub total_commission: i64,
    pub withdrawable: i64,
}

impl DistributorStats {
    pub fn collect<'a>(list: impl IntoIterator<Item = &'a Distributor>) -> Self {
        list.into_iter().fold(Self::default(), |mut stats, d| {
            stats.total += 1;
            match d.status {
                DistributorStatus::Active => stats.active += 1,
                DistributorStatus::Pending => stats.pending += 1,
                DistributorStatus::Frozen => stats.frozen += 1,
            }
            stats.total_commission = stats.total_commission.saturating_add(d.total_commission);
            stats.withdrawable = stats.withdrawable.saturating_add(d.withdrawable);
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    fn distributor(id: i64, name: &str, status: DistributorStatus, level: u8, commission: i64) -> Distributor {
        Distributor {
            id: DistributorId::new(id),
            name: name.to_string(),
            phone: format!("1380000{id:04}"),
            level,
            status,
            total_commission: commission,
            withdrawable: commission / 2,
            joined_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Distributor> {
        vec![
            distributor(1, "Alice Chen", DistributorStatus::Active, 1, 12_000),
            distributor(2, "Bob Li", DistributorStatus::Pending, 2, 0),
            distributor(3, "alicia wong", DistributorStatus::Frozen, 1, 3_500),
            distributor(4, "Dan Xu", DistributorStatus::Active, 2, 800),
        ]
    }

    #[test]
    fn keyword_matches_name_case_insensitively_and_phone() {
        let list = sample();
        let by_name = DistributorFilter {
            keyword: Some("ALIC".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = by_name.apply(&list).iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);

        let by_phone = DistributorFilter {
            keyword: Some("0004".into()),
            ..Default::default()
        };
        assert_eq!(by_phone.apply(&list).len(), 1);
    }

    #[test]
    fn criteria_combine() {
        let list = sample();
        let filter = DistributorFilter {
            keyword: Some("  ".into()),
            status: Some(DistributorStatus::Active),
            level: Some(2),
        };
        let ids: Vec<i64> = filter.apply(&list).iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn stats_over_filtered_rows() {
        let list = sample();
        let stats = DistributorStats::collect(&list);
        assert_eq!(
            stats,
            DistributorStats {
                total: 4,
                active: 2,
                pending: 1,
                frozen: 1,
                total_commission: 16_300,
                withdrawable: 6_000 + 1_750 + 400,
            }
        );

        let level_one = DistributorFilter {
            level: Some(1),
            ..Default::default()
        };
        let stats = DistributorStats::collect(level_one.apply(&list));
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_commission, 15_500);
    }

    #[test]
    fn amount_sums_saturate_instead_of_overflowing() {
        let mut whale = distributor(1, "Whale", DistributorStatus::Active, 3, i64::MAX);
        whale.withdrawable = i64::MAX;
        let list = vec![whale.clone(), whale, distributor(2, "Ann", DistributorStatus::Active, 1, 500)];

        let stats = DistributorStats::collect(&list);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.total_commission, i64::MAX);
        assert_eq!(stats.withdrawable, i64::MAX);
    }

    #[test]
    fn deserializes_backend_rows() {
        let d: Distributor = serde_json::from_str(
            r#"{"id":5,"name":"Eve","status":"frozen","totalCommission":100,"joinedAt":"2026-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert_eq!(d.status, DistributorStatus::Frozen);
        assert_eq!(d.total_commission, 100);
        assert_eq!(d.level, 0);
    }

    proptest! {
        #[test]
        fn status_counts_add_up(statuses in prop::collection::vec(0u8..3, 0..40)) {
            let list: Vec<Distributor> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let status = match s {
                        0 => DistributorStatus::Pending,
                        1 => DistributorStatus::Active,
                        _ => DistributorStatus::Frozen,
                    };
                    distributor(i as i64, "x", status, 1, 10)
                })
                .collect();
            let stats = DistributorStats::collect(&list);
            prop_assert_eq!(stats.active + stats.pending + stats.frozen, stats.total);
            prop_assert_eq!(stats.total, list.len());
            prop_assert_eq!(stats.total_commission, 10 * list.len() as i64);
        }
    }
}
