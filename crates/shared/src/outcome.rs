//! Explicit result of a list fetch
//!
//! The mobile screens used to collapse every failure into an empty list.
//! `FetchOutcome` keeps "nothing there" and "could not ask" apart, and
//! [`FetchOutcome::into_items`] still offers the collapsed view for callers
//! that only want data.

use crate::error::{ApiError, ApiResult};

#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// The backend answered with at least one record
    Loaded(Vec<T>),
    /// The backend answered successfully with no records
    Empty,
    /// The request failed; the reason is kept for the caller
    Failed(ApiError),
}

impl<T> FetchOutcome<T> {
    pub fn from_result(result: ApiResult<Vec<T>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => FetchOutcome::Empty,
            Ok(items) => FetchOutcome::Loaded(items),
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    /// Records, or an empty slice for `Empty` and `Failed`
    pub fn items(&self) -> &[T] {
        match self {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => &[],
        }
    }

    /// Degrade to a plain list: failures read as "no records"
    pub fn into_items(self) -> Vec<T> {
        match self {
            FetchOutcome::Loaded(items) => items,
            FetchOutcome::Empty | FetchOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match self {
            FetchOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Transform the whole record list, keeping `Empty`/`Failed` as they are.
    /// A transform that drops every record yields `Empty`.
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loaded(items) => FetchOutcome::from_result(Ok(f(items))),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> ApiError {
        ApiError::Status {
            path: "/plano-pagamento".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_from_result() {
        assert!(matches!(
            FetchOutcome::from_result(Ok(vec![1, 2])),
            FetchOutcome::Loaded(v) if v == vec![1, 2]
        ));
        assert!(matches!(
            FetchOutcome::<i32>::from_result(Ok(vec![])),
            FetchOutcome::Empty
        ));
        assert!(FetchOutcome::<i32>::from_result(Err(failure())).is_failed());
    }

    #[test]
    fn test_failure_degrades_to_empty_list() {
        let outcome = FetchOutcome::<i32>::Failed(failure());
        assert!(outcome.items().is_empty());
        assert!(outcome.failure().is_some());
        assert_eq!(outcome.into_items(), Vec::<i32>::new());
    }

    #[test]
    fn test_map_items() {
        let outcome = FetchOutcome::Loaded(vec![1, 2, 3, 4]);
        let evens = outcome.map_items(|v| v.into_iter().filter(|n| n % 2 == 0).collect());
        assert_eq!(evens.items(), &[2, 4]);

        let none = FetchOutcome::Loaded(vec![1, 3]).map_items(|v| {
            v.into_iter().filter(|n| n % 2 == 0).collect::<Vec<i32>>()
        });
        assert!(matches!(none, FetchOutcome::Empty));

        let failed = FetchOutcome::<i32>::Failed(failure()).map_items(|v| v);
        assert!(failed.is_failed());
    }
}
