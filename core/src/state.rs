//! Filter, sort and paging state for the employee list view.
//!
//! The presentation layer owns one `QueryState` per view and hands
//! `to_query()` to the repository on every fetch. Changing a filter moves
//! back to the first page. Clamping `limit` to the range the UI offers is the
//! UI's job.

use crate::query::{EmployeeQuery, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::types::{SortField, SortOrder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub limit: u32,
    pub name: String,
    pub email: String,
    pub department: String,
    pub sort: SortField,
    pub order: SortOrder,
}

/// Filters to change; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            name: String::new(),
            email: String::new(),
            department: String::new(),
            sort: SortField::Id,
            order: SortOrder::Desc,
        }
    }
}

impl QueryState {
    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }

    pub fn set_filters(&mut self, update: FilterUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(department) = update.department {
            self.department = department;
        }
        self.page = DEFAULT_PAGE;
    }

    /// Flip the order when `field` is already active, otherwise sort
    /// ascending by `field`.
    pub fn set_sorting(&mut self, field: SortField) {
        if field == self.sort {
            self.order = self.order.toggled();
        } else {
            self.sort = field;
            self.order = SortOrder::Asc;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_query(&self) -> EmployeeQuery {
        let filter = |value: &str| Some(value.to_string()).filter(|v| !v.trim().is_empty());
        EmployeeQuery {
            page: self.page,
            limit: self.limit,
            name: filter(&self.name),
            email: filter(&self.email),
            department: filter(&self.department),
            sort: Some(self.sort),
            order: self.order,
        }
    }

    /// Number of pages for `total` records; never less than one.
    pub fn total_pages(&self, total: u64) -> u64 {
        let limit = u64::from(self.limit.max(1));
        total.div_ceil(limit).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sort_by_id_descending() {
        let state = QueryState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.limit, 10);
        assert_eq!(state.sort, SortField::Id);
        assert_eq!(state.order, SortOrder::Desc);
    }

    #[test]
    fn setting_a_filter_resets_page() {
        let mut state = QueryState::default();
        state.set_page(4);
        state.set_filters(FilterUpdate {
            name: Some("an".to_string()),
            ..Default::default()
        });
        assert_eq!(state.page, 1);
        assert_eq!(state.name, "an");
        assert_eq!(state.email, "");
    }

    #[test]
    fn filter_update_keeps_unspecified_filters() {
        let mut state = QueryState::default();
        state.set_filters(FilterUpdate {
            department: Some("Sales".to_string()),
            ..Default::default()
        });
        state.set_filters(FilterUpdate {
            email: Some("x.com".to_string()),
            ..Default::default()
        });
        assert_eq!(state.department, "Sales");
        assert_eq!(state.email, "x.com");
    }

    #[test]
    fn changing_limit_keeps_page() {
        let mut state = QueryState::default();
        state.set_page(3);
        state.set_limit(50);
        assert_eq!(state.page, 3);
        assert_eq!(state.limit, 50);
    }

    #[test]
    fn toggling_active_sort_flips_order() {
        let mut state = QueryState::default();
        state.set_sorting(SortField::Id);
        assert_eq!(state.order, SortOrder::Asc);
        state.set_sorting(SortField::Id);
        assert_eq!(state.order, SortOrder::Desc);
    }

    #[test]
    fn new_sort_field_starts_ascending() {
        let mut state = QueryState::default();
        state.set_sorting(SortField::Name);
        assert_eq!(state.sort, SortField::Name);
        assert_eq!(state.order, SortOrder::Asc);

        state.set_sorting(SortField::Name);
        state.set_sorting(SortField::JoinDate);
        assert_eq!(state.order, SortOrder::Asc);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = QueryState::default();
        state.set_filters(FilterUpdate {
            name: Some("x".to_string()),
            ..Default::default()
        });
        state.set_sorting(SortField::Email);
        state.set_page(9);
        state.reset();
        assert_eq!(state, QueryState::default());
    }

    #[test]
    fn to_query_drops_blank_filters() {
        let mut state = QueryState::default();
        state.set_filters(FilterUpdate {
            name: Some("  ".to_string()),
            department: Some("Sales".to_string()),
            ..Default::default()
        });
        let query = state.to_query();
        assert!(query.name.is_none());
        assert_eq!(query.department.as_deref(), Some("Sales"));
        assert_eq!(
            query.to_query_string(),
            "department=Sales&_sort=id&_order=desc&_page=1&_limit=10"
        );
    }

    #[test]
    fn total_pages_rounds_up_and_never_hits_zero() {
        let state = QueryState::default();
        assert_eq!(state.total_pages(0), 1);
        assert_eq!(state.total_pages(10), 1);
        assert_eq!(state.total_pages(25), 3);
    }
}
