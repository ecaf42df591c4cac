//! Page-number pagination over a counted, ordered listing.
//!
//! Resolution rules: a missing or non-integer page number selects page 1;
//! an integer outside `1..=num_pages` selects the last page. A listing with
//! no rows still has a single, empty page.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
    count: u64,
}

/// The slice of rows a resolved page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u32,
    pub num_pages: u32,
    pub count: u64,
    pub limit: i64,
    pub offset: i64,
}

impl Paginator {
    pub fn new(per_page: u32, count: u64) -> Self {
        Self {
            per_page: per_page.max(1),
            count,
        }
    }

    pub fn num_pages(&self) -> u32 {
        if self.count == 0 {
            return 1;
        }
        let pages = self.count.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn window(&self, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages();
        let number = match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            None => 1,
            Some(n) if n >= 1 && n <= i64::from(num_pages) => n as u32,
            Some(_) => num_pages,
        };
        let offset = u64::from(number - 1) * u64::from(self.per_page);
        PageWindow {
            number,
            num_pages,
            count: self.count,
            limit: i64::from(self.per_page),
            offset: i64::try_from(offset).unwrap_or(i64::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u32,
    pub num_pages: u32,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u32>,
    pub previous_page_number: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(object_list: Vec<T>, window: PageWindow) -> Self {
        let has_next = window.number < window.num_pages;
        let has_previous = window.number > 1;
        Self {
            object_list,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_next,
            has_previous,
            next_page_number: has_next.then(|| window.number + 1),
            previous_page_number: has_previous.then(|| window.number - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}
