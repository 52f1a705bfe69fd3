//! End-to-end scenarios for rating, saving and listing, run against the
//! pure domain types the server persists.

use chrono::{DateTime, Duration, TimeZone, Utc};
use potluck_core::{
    sort_recipes, Difficulty, Listable, Page, PageRequest, RatingLedger, RatingValue, SavedSet,
    SortMode,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Recipe {
    id: Uuid,
    title: &'static str,
    difficulty: &'static str,
    created_at: DateTime<Utc>,
    ledger: RatingLedger,
}

impl Recipe {
    fn new(title: &'static str, difficulty: &'static str, minutes_after_epoch: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            difficulty,
            created_at: Utc.timestamp_opt(0, 0).unwrap() + Duration::minutes(minutes_after_epoch),
            ledger: RatingLedger::new(),
        }
    }
}

impl Listable for Recipe {
    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn rating_avg(&self) -> f64 {
        self.ledger.aggregate().average
    }
    fn rating_count(&self) -> i32 {
        self.ledger.aggregate().count
    }
    fn difficulty(&self) -> Difficulty {
        Difficulty::from_label(self.difficulty)
    }
}

fn rate(ledger: &mut RatingLedger, user: Uuid, value: i64) -> (f64, i32) {
    ledger.record(user, RatingValue::new(value).unwrap());
    let agg = ledger.aggregate();
    (agg.average, agg.count)
}

#[test]
fn rating_sequence_on_a_fresh_twin() {
    let mut ledger = RatingLedger::new();
    let agg = ledger.aggregate();
    assert_eq!((agg.average, agg.count), (0.0, 0));

    let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
    assert_eq!(rate(&mut ledger, u1, 4), (4.0, 1));
    assert_eq!(rate(&mut ledger, u2, 2), (3.0, 2));
    assert_eq!(rate(&mut ledger, u1, 5), (3.5, 2));
    assert_eq!(ledger.aggregate().rounded, 4);
}

#[test]
fn resubmission_counts_user_once_and_keeps_latest() {
    for first in 1..=5 {
        for second in 1..=5 {
            let user = Uuid::new_v4();
            let other = Uuid::new_v4();
            let mut ledger = RatingLedger::new();
            rate(&mut ledger, other, 3);
            rate(&mut ledger, user, first);
            let (avg, count) = rate(&mut ledger, user, second);

            assert_eq!(count, 2);
            assert_eq!(avg, (3 + second) as f64 / 2.0);
            assert_eq!(
                ledger.value_for(user).map(RatingValue::get),
                Some(second as u8)
            );
        }
    }
}

#[test]
fn average_is_sum_over_length_and_within_bounds() {
    let mut ledger = RatingLedger::new();
    let values = [5, 1, 4, 4, 2, 3, 5];
    for v in values {
        ledger.record(Uuid::new_v4(), RatingValue::new(v).unwrap());
        let agg = ledger.aggregate();
        let sum: u32 = ledger.entries().iter().map(|e| u32::from(e.value.get())).sum();
        assert_eq!(agg.average, f64::from(sum) / ledger.len() as f64);
        assert!((1.0..=5.0).contains(&agg.average));
        assert_eq!(agg.count as usize, ledger.len());
    }
}

#[test]
fn save_unsave_save_leaves_one_occurrence() {
    let id = Uuid::new_v4();
    let mut saved = SavedSet::default();
    saved.save(id);
    saved.unsave(id);
    saved.save(id);
    assert_eq!(saved.ids().iter().filter(|s| **s == id).count(), 1);

    // Unsaving something never saved is a quiet no-op.
    assert!(!saved.unsave(Uuid::new_v4()));
    assert_eq!(saved.len(), 1);
}

#[test]
fn easiest_sort_breaks_ties_newest_first() {
    let mut recipes = vec![
        Recipe::new("Souffle", "Hard", 1),
        Recipe::new("Toast", "Beginner", 2),
        Recipe::new("Risotto", "Intermediate", 3),
        Recipe::new("Salad", "Beginner", 4),
    ];
    sort_recipes(&mut recipes, SortMode::Easiest);

    let titles: Vec<&str> = recipes.iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Salad", "Toast", "Risotto", "Souffle"]);
}

#[test]
fn saved_listing_paginates_only_resolved_recipes() {
    let existing: Vec<Recipe> = (0..5)
        .map(|i| Recipe::new("Stew", "Beginner", i))
        .collect();
    let deleted_id = Uuid::new_v4();

    let mut saved = SavedSet::default();
    saved.save(deleted_id);
    for r in &existing {
        saved.save(r.id);
    }

    // Resolve the saved ids against what still exists.
    let mut resolved: Vec<Recipe> = existing
        .into_iter()
        .filter(|r| saved.contains(r.id))
        .collect();
    sort_recipes(&mut resolved, SortMode::Newest);

    let request = PageRequest::new(Some(2), Some(2));
    let page = Page::from_all(resolved, request);

    assert_eq!(page.total, 5);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.len() as i64 <= request.limit);

    let beyond = Page::from_all(Vec::<Recipe>::new(), PageRequest::new(Some(4), None));
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.pages, 0);
}

#[test]
fn top_rated_uses_ledger_aggregates() {
    let mut loved = Recipe::new("Pie", "Hard", 1);
    let mut liked = Recipe::new("Cake", "Beginner", 2);
    let unrated = Recipe::new("Soup", "Beginner", 3);

    loved.ledger.record(Uuid::new_v4(), RatingValue::new(5).unwrap());
    liked.ledger.record(Uuid::new_v4(), RatingValue::new(4).unwrap());

    let mut recipes = vec![unrated, liked, loved];
    sort_recipes(&mut recipes, SortMode::TopRated);
    let titles: Vec<&str> = recipes.iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Pie", "Cake", "Soup"]);
}
