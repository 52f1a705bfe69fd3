//! Sort order and pagination for recipe listings.
//!
//! The database listing expresses these orders in SQL; saved-recipe
//! listings resolve ids first and then sort and paginate in memory with the
//! functions here, so totals only count recipes that still exist.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::difficulty::Difficulty;
use crate::error::CoreError;

pub const DEFAULT_LIMIT: i64 = 12;
pub const MAX_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Creation time, newest first
    #[default]
    Newest,
    /// Average rating, then rating count, then newest
    TopRated,
    /// Difficulty rank, then newest
    Easiest,
}

impl FromStr for SortMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "newest" => Ok(SortMode::Newest),
            "favorite" | "top" | "rating" => Ok(SortMode::TopRated),
            "easiest" => Ok(SortMode::Easiest),
            other => Err(CoreError::InvalidArgument(format!(
                "Unknown sort '{}'. Expected one of: newest, top, favorite, rating, easiest",
                other
            ))),
        }
    }
}

/// Fields a recipe needs to expose to be sorted by any [`SortMode`].
pub trait Listable {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn rating_avg(&self) -> f64;
    fn rating_count(&self) -> i32;
    fn difficulty(&self) -> Difficulty;
}

fn newest_first<T: Listable>(a: &T, b: &T) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| b.id().cmp(&a.id()))
}

pub fn compare<T: Listable>(mode: SortMode, a: &T, b: &T) -> Ordering {
    match mode {
        SortMode::Newest => newest_first(a, b),
        SortMode::TopRated => b
            .rating_avg()
            .total_cmp(&a.rating_avg())
            .then_with(|| b.rating_count().cmp(&a.rating_count()))
            .then_with(|| newest_first(a, b)),
        SortMode::Easiest => a
            .difficulty()
            .rank()
            .cmp(&b.difficulty().rank())
            .then_with(|| newest_first(a, b)),
    }
}

pub fn sort_recipes<T: Listable>(items: &mut [T], mode: SortMode) {
    items.sort_by(|a, b| compare(mode, a, b));
}

/// A validated page request: 1-indexed page and a bounded limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    /// Wrap one already-fetched page of items.
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total,
            pages: page_count(total, request.limit),
        }
    }

    /// Cut one page out of the full result set.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.limit as usize)
            .collect();
        Self::new(items, total, request)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            pages: self.pages,
        }
    }
}
