//! Display-ready projections of an [`AggregatedDataset`]. Nothing here
//! draws anything; a renderer consumes these as plain data.

use serde::Serialize;
use xplens_utils::formatting::{format_ratio, text_or_na};
use xplens_utils::time::date_label;

use crate::aggregate::AggregatedDataset;

pub const BREAKDOWN_LABELS: [&str; 3] = ["Projects", "Audits", "Quests"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub xp_earned: i64,
    pub audit_ratio: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct XpPoint {
    pub date: String,
    pub xp: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XpBreakdown {
    pub labels: [&'static str; 3],
    pub values: [f64; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct XpTotals {
    pub gained: i64,
    pub lost: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub card: ProfileCard,
    pub history: Vec<XpPoint>,
    pub breakdown: XpBreakdown,
    pub totals: XpTotals,
}

impl ProfileView {
    pub fn from_dataset(dataset: &AggregatedDataset) -> Self {
        let user = &dataset.user;

        let card = ProfileCard {
            first_name: text_or_na(user.first_name.as_deref()),
            last_name: text_or_na(user.last_name.as_deref()),
            email: text_or_na(user.email.as_deref()),
            xp_earned: user.total_up,
            audit_ratio: format_ratio(user.audit_ratio),
        };

        let history = dataset
            .transactions
            .iter()
            .map(|tx| XpPoint {
                date: date_label(&tx.created_at),
                xp: tx.amount,
            })
            .collect();

        let xp = dataset.xp_distribution;
        let breakdown = XpBreakdown {
            labels: BREAKDOWN_LABELS,
            values: [xp.projects, xp.audits, xp.quests],
        };

        Self {
            card,
            history,
            breakdown,
            totals: XpTotals {
                gained: user.total_up,
                lost: user.total_down,
            },
        }
    }
}
