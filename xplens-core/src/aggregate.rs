use serde::Serialize;
use xplens_api::{ResultKind, ResultRecord, TransactionRecord, UserProfile};

/// XP summed per category. Recomputed from scratch on every pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct XpDistribution {
    pub projects: f64,
    pub audits: f64,
    pub quests: f64,
}

/// Everything the renderer needs, produced once per pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDataset {
    pub user: UserProfile,
    pub transactions: Vec<TransactionRecord>,
    pub xp_distribution: XpDistribution,
}

/// Bucket result grades by tag: `tester` to projects, `user_audit` to
/// audits, `quest` to quests. Other tags are skipped. Grades are summed as
/// given, negative ones included.
pub fn aggregate(results: &[ResultRecord]) -> XpDistribution {
    results
        .iter()
        .fold(XpDistribution::default(), |mut acc, record| {
            match record.kind {
                ResultKind::Tester => acc.projects += record.grade,
                ResultKind::UserAudit => acc.audits += record.grade,
                ResultKind::Quest => acc.quests += record.grade,
                ResultKind::Other(_) => {}
            }
            acc
        })
}
