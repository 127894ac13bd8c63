//! Dashboard aggregation. Every function here is a pure fold over a
//! slice of reviews; callers fetch the window through the normal list
//! path so the numbers can never drift from the records themselves.

use crate::types::enums::TrendPeriod;
use crate::types::metrics::{DashboardOverview, DeveloperRanking, RepositoryRanking, TrendPoint};
use crate::types::review::CodeReview;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use std::collections::BTreeMap;

pub fn overview(reviews: &[CodeReview], window_days: u32) -> DashboardOverview {
    let total_reviews = reviews.len() as u64;

    let mut repos = std::collections::BTreeSet::new();
    for review in reviews {
        repos.insert(&review.repo_id);
    }

    let completed: Vec<&CodeReview> = reviews.iter().filter(|r| r.is_completed()).collect();
    let completed_count = completed.len() as u64;

    let average_quality_score = mean_score(&completed);
    let critical_issues = completed
        .iter()
        .map(|r| r.critical_issue_count() as u64)
        .sum();

    let completion_rate = if total_reviews == 0 {
        0.0
    } else {
        completed_count as f64 / total_reviews as f64
    };

    DashboardOverview {
        total_reviews,
        active_repositories: repos.len() as u64,
        average_quality_score,
        critical_issues,
        completion_rate,
        window_days,
    }
}

pub fn repository_ranking(reviews: &[CodeReview], limit: usize) -> Vec<RepositoryRanking> {
    let mut by_repo: BTreeMap<_, Vec<&CodeReview>> = BTreeMap::new();
    for review in reviews.iter().filter(|r| r.is_completed()) {
        by_repo.entry(review.repo_id.clone()).or_default().push(review);
    }

    let mut rankings: Vec<RepositoryRanking> = by_repo
        .into_iter()
        .map(|(repo_id, completed)| RepositoryRanking {
            repo_id,
            average_score: mean_score(&completed),
            total_reviews: completed.len() as u64,
            critical_issues: completed
                .iter()
                .map(|r| r.critical_issue_count() as u64)
                .sum(),
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then(b.total_reviews.cmp(&a.total_reviews))
            .then(a.repo_id.cmp(&b.repo_id))
    });
    rankings.truncate(limit);
    rankings
}

pub fn developer_ranking(
    reviews: &[CodeReview],
    window_days: u32,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<DeveloperRanking> {
    let midpoint = now - Duration::days(i64::from(window_days) / 2);

    let mut by_developer: BTreeMap<&str, Vec<&CodeReview>> = BTreeMap::new();
    for review in reviews.iter().filter(|r| r.is_completed()) {
        by_developer
            .entry(review.developer.as_str())
            .or_default()
            .push(review);
    }

    let mut rankings: Vec<DeveloperRanking> = by_developer
        .into_iter()
        .map(|(developer, completed)| {
            let recent: Vec<&CodeReview> = completed
                .iter()
                .filter(|r| r.created_at >= midpoint)
                .copied()
                .collect();
            let earlier: Vec<&CodeReview> = completed
                .iter()
                .filter(|r| r.created_at < midpoint)
                .copied()
                .collect();
            let improvement = if recent.is_empty() || earlier.is_empty() {
                0.0
            } else {
                mean_score(&recent) - mean_score(&earlier)
            };

            DeveloperRanking {
                developer: developer.to_string(),
                average_score: mean_score(&completed),
                total_reviews: completed.len() as u64,
                critical_issues: completed
                    .iter()
                    .map(|r| r.critical_issue_count() as u64)
                    .sum(),
                improvement,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.average_score
            .total_cmp(&a.average_score)
            .then(b.total_reviews.cmp(&a.total_reviews))
            .then(a.developer.cmp(&b.developer))
    });
    rankings.truncate(limit);
    rankings
}

pub fn trends(reviews: &[CodeReview], period: TrendPeriod) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<DateTime<Utc>, Vec<&CodeReview>> = BTreeMap::new();
    for review in reviews {
        buckets
            .entry(bucket_start(review.created_at, period))
            .or_default()
            .push(review);
    }

    buckets
        .into_iter()
        .map(|(date, members)| {
            let completed: Vec<&CodeReview> =
                members.iter().filter(|r| r.is_completed()).copied().collect();
            let issue_count = completed
                .iter()
                .filter_map(|r| r.analysis_result.as_ref())
                .map(|a| a.issues.len() as u64)
                .sum();

            TrendPoint {
                date,
                average_score: mean_score(&completed),
                issue_count,
                review_count: members.len() as u64,
            }
        })
        .collect()
}

/// Midnight UTC of the calendar day, or of the Monday of the ISO week.
fn bucket_start(at: DateTime<Utc>, period: TrendPeriod) -> DateTime<Utc> {
    let day = at.date_naive();
    let start = match period {
        TrendPeriod::Daily => day,
        TrendPeriod::Weekly => {
            day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
        }
    };
    Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default())
}

fn mean_score(completed: &[&CodeReview]) -> f64 {
    let scores: Vec<f64> = completed
        .iter()
        .filter_map(|r| r.analysis_result.as_ref())
        .map(|a| f64::from(a.quality_score))
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::{IssueKind, ReviewStatus};
    use crate::types::ids::{RepoId, ReviewId};
    use crate::types::review::{AnalysisResult, Issue};
    use chrono::TimeZone;

    fn review(
        repo: &RepoId,
        developer: &str,
        status: ReviewStatus,
        score: u8,
        critical: usize,
        created_at: DateTime<Utc>,
    ) -> CodeReview {
        let analysis = (status == ReviewStatus::Completed).then(|| AnalysisResult {
            quality_score: score,
            issues: (0..critical)
                .map(|i| Issue {
                    kind: IssueKind::Critical,
                    message: format!("issue {i}"),
                    line: Some(1),
                    severity: 9,
                })
                .collect(),
            suggestions: Vec::new(),
            raw_review: "ok".to_string(),
        });

        CodeReview {
            id: ReviewId::generate(),
            repo_id: repo.clone(),
            branch: "main".to_string(),
            developer: developer.to_string(),
            file_name: "Main.java".to_string(),
            file_path: None,
            file_content: None,
            commit_sha: None,
            status,
            prompt_id: None,
            model_id: None,
            analysis_result: analysis,
            error_message: None,
            created_at,
            updated_at: created_at,
            completed_at: (status == ReviewStatus::Completed).then_some(created_at),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn overview_counts_and_rates() {
        let repo_a = RepoId::generate();
        let repo_b = RepoId::generate();
        let reviews = vec![
            review(&repo_a, "ana", ReviewStatus::Completed, 90, 1, at(1, 9)),
            review(&repo_a, "ana", ReviewStatus::Completed, 80, 0, at(2, 9)),
            review(&repo_b, "bruno", ReviewStatus::Pending, 0, 0, at(3, 9)),
            review(&repo_b, "bruno", ReviewStatus::Failed, 0, 0, at(3, 10)),
        ];

        let overview = overview(&reviews, 30);
        assert_eq!(overview.total_reviews, 4);
        assert_eq!(overview.active_repositories, 2);
        assert_eq!(overview.average_quality_score, 85.0);
        assert_eq!(overview.critical_issues, 1);
        assert_eq!(overview.completion_rate, 0.5);
        assert_eq!(overview.window_days, 30);
    }

    #[test]
    fn overview_of_empty_window_is_all_zero() {
        let overview = overview(&[], 7);
        assert_eq!(overview.total_reviews, 0);
        assert_eq!(overview.average_quality_score, 0.0);
        assert_eq!(overview.completion_rate, 0.0);
    }

    #[test]
    fn repositories_rank_by_average_score_descending() {
        let repo_a = RepoId::generate();
        let repo_b = RepoId::generate();
        let repo_c = RepoId::generate();
        let reviews = vec![
            review(&repo_a, "ana", ReviewStatus::Completed, 88, 0, at(1, 9)),
            review(&repo_b, "ana", ReviewStatus::Completed, 95, 0, at(1, 10)),
            review(&repo_c, "ana", ReviewStatus::Completed, 92, 0, at(1, 11)),
        ];

        let ranking = repository_ranking(&reviews, 10);
        let scores: Vec<f64> = ranking.iter().map(|r| r.average_score).collect();
        assert_eq!(scores, vec![95.0, 92.0, 88.0]);
        assert_eq!(ranking[0].repo_id, repo_b);
    }

    #[test]
    fn ranking_ignores_incomplete_reviews_and_honors_limit() {
        let repo_a = RepoId::generate();
        let repo_b = RepoId::generate();
        let reviews = vec![
            review(&repo_a, "ana", ReviewStatus::Completed, 70, 0, at(1, 9)),
            review(&repo_b, "ana", ReviewStatus::Completed, 60, 0, at(1, 10)),
            review(&repo_b, "ana", ReviewStatus::InProgress, 0, 0, at(1, 11)),
        ];

        let ranking = repository_ranking(&reviews, 1);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].repo_id, repo_a);
        assert_eq!(ranking[0].total_reviews, 1);
    }

    #[test]
    fn developer_improvement_compares_window_halves() {
        let repo = RepoId::generate();
        let now = at(30, 12);
        // 30-day window: midpoint at day 15.
        let reviews = vec![
            review(&repo, "ana", ReviewStatus::Completed, 70, 0, at(2, 9)),
            review(&repo, "ana", ReviewStatus::Completed, 90, 0, at(28, 9)),
            review(&repo, "bruno", ReviewStatus::Completed, 80, 0, at(28, 10)),
        ];

        let ranking = developer_ranking(&reviews, 30, now, 10);
        let ana = ranking.iter().find(|r| r.developer == "ana").unwrap();
        assert_eq!(ana.improvement, 20.0);

        // No early-half reviews, so no improvement signal.
        let bruno = ranking.iter().find(|r| r.developer == "bruno").unwrap();
        assert_eq!(bruno.improvement, 0.0);
    }

    #[test]
    fn daily_trends_bucket_by_calendar_day() {
        let repo = RepoId::generate();
        let reviews = vec![
            review(&repo, "ana", ReviewStatus::Completed, 80, 1, at(1, 9)),
            review(&repo, "ana", ReviewStatus::Completed, 90, 0, at(1, 17)),
            review(&repo, "ana", ReviewStatus::Pending, 0, 0, at(3, 9)),
        ];

        let points = trends(&reviews, TrendPeriod::Daily);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(points[0].average_score, 85.0);
        assert_eq!(points[0].issue_count, 1);
        assert_eq!(points[0].review_count, 2);
        // A bucket with no completed reviews still appears, score 0.
        assert_eq!(points[1].average_score, 0.0);
        assert_eq!(points[1].review_count, 1);
    }

    #[test]
    fn weekly_trends_start_on_monday() {
        let repo = RepoId::generate();
        // 2026-03-04 is a Wednesday; its ISO week starts 2026-03-02.
        let reviews = vec![review(
            &repo,
            "ana",
            ReviewStatus::Completed,
            75,
            0,
            at(4, 9),
        )];

        let points = trends(&reviews, TrendPeriod::Weekly);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].date, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    }
}
