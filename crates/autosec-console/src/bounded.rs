use std::collections::VecDeque;

/// Which end of a [`BoundedList`] receives new entries.
///
/// Overflow always evicts from the opposite end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    NewestFirst,
    NewestLast,
}

/// Fixed-capacity display list with an optional placeholder.
///
/// While the list holds no entries it may show a single placeholder line
/// (e.g. "No alerts yet"). The next real insertion drops the placeholder.
#[derive(Debug, Clone)]
pub struct BoundedList<T> {
    items: VecDeque<T>,
    capacity: usize,
    insertion: Insertion,
    placeholder: Option<String>,
}

impl<T> BoundedList<T> {
    pub fn new(capacity: usize, insertion: Insertion) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            insertion,
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Inserts an entry, returning the evicted one if the list was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.placeholder = None;
        if self.capacity == 0 {
            return Some(item);
        }

        match self.insertion {
            Insertion::NewestFirst => {
                self.items.push_front(item);
                if self.items.len() > self.capacity {
                    return self.items.pop_back();
                }
            }
            Insertion::NewestLast => {
                self.items.push_back(item);
                if self.items.len() > self.capacity {
                    return self.items.pop_front();
                }
            }
        }
        None
    }

    /// Drops every entry and shows `placeholder` instead.
    pub fn show_placeholder(&mut self, placeholder: impl Into<String>) {
        self.items.clear();
        self.placeholder = Some(placeholder.into());
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.placeholder = None;
    }

    pub fn placeholder(&self) -> Option<&str> {
        if self.items.is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    /// Entries in display order (top of the panel first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// The most recently inserted entry.
    pub fn newest(&self) -> Option<&T> {
        match self.insertion {
            Insertion::NewestFirst => self.items.front(),
            Insertion::NewestLast => self.items.back(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of rendered rows, counting a visible placeholder as one.
    pub fn display_len(&self) -> usize {
        if self.items.is_empty() && self.placeholder.is_some() {
            1
        } else {
            self.items.len()
        }
    }

    pub fn insertion(&self) -> Insertion {
        self.insertion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_evicts_oldest_from_the_back() {
        let mut list = BoundedList::new(10, Insertion::NewestFirst);
        for i in 0..25 {
            list.push(i);
        }

        assert_eq!(list.len(), 10);
        let items: Vec<_> = list.iter().copied().collect();
        assert_eq!(items, (15..25).rev().collect::<Vec<_>>());
        assert_eq!(list.newest(), Some(&24));
    }

    #[test]
    fn newest_last_evicts_oldest_from_the_front() {
        let mut list = BoundedList::new(100, Insertion::NewestLast);
        for i in 0..150 {
            list.push(i);
        }

        assert_eq!(list.len(), 100);
        assert_eq!(list.iter().next(), Some(&50));
        assert_eq!(list.newest(), Some(&149));
    }

    #[test]
    fn push_reports_evicted_entry() {
        let mut list = BoundedList::new(2, Insertion::NewestFirst);
        assert_eq!(list.push("a"), None);
        assert_eq!(list.push("b"), None);
        assert_eq!(list.push("c"), Some("a"));
    }

    #[test]
    fn placeholder_is_dropped_by_first_insertion() {
        let mut list =
            BoundedList::new(10, Insertion::NewestFirst).with_placeholder("No alerts yet");
        assert_eq!(list.placeholder(), Some("No alerts yet"));
        assert_eq!(list.display_len(), 1);
        assert!(list.is_empty());

        list.push("Port Scan from 10.0.0.15");
        assert_eq!(list.placeholder(), None);
        assert_eq!(list.display_len(), 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn show_placeholder_replaces_entries() {
        let mut list = BoundedList::new(10, Insertion::NewestFirst);
        list.push(1);
        list.push(2);
        list.show_placeholder("All alerts cleared");

        assert!(list.is_empty());
        assert_eq!(list.display_len(), 1);
        assert_eq!(list.placeholder(), Some("All alerts cleared"));
    }
}
