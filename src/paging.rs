/// Page cursor for the `?page=&limit=` list endpoints. Pages are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

impl Paging {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 0,
            limit: limit.max(1),
            has_more: true,
        }
    }

    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Fold a fetched page into the list. Page 1 replaces, later pages append.
    pub fn absorb<T>(&self, current: &[T], page: u32, rows: Vec<T>) -> (Paging, Vec<T>)
    where
        T: Clone,
    {
        let has_more = rows.len() == self.limit as usize;
        let merged = if page <= 1 {
            rows
        } else {
            let mut merged = current.to_vec();
            merged.extend(rows);
            merged
        };
        (
            Paging {
                page,
                limit: self.limit,
                has_more,
            },
            merged,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_replaces_and_full_page_means_more() {
        let paging = Paging::new(3);
        let (paging, rows) = paging.absorb(&[9, 9], 1, vec![1, 2, 3]);
        assert_eq!(rows, vec![1, 2, 3]);
        assert!(paging.has_more);
        assert_eq!(paging.next_page(), 2);
    }

    #[test]
    fn short_page_appends_and_stops() {
        let paging = Paging {
            page: 1,
            limit: 3,
            has_more: true,
        };
        let (paging, rows) = paging.absorb(&[1, 2, 3], 2, vec![4]);
        assert_eq!(rows, vec![1, 2, 3, 4]);
        assert!(!paging.has_more);
        assert_eq!(paging.page, 2);
    }

    #[test]
    fn zero_limit_is_clamped() {
        assert_eq!(Paging::new(0).limit, 1);
    }
}
