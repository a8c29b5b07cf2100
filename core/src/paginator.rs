use crate::{Error, Result};
use std::fmt;
use std::ops::Deref;

/// One page: a contiguous run of items.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T>(&'a [T]);

impl<T> Clone for Page<'_, T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Page<'_, T> {}

impl<'a, T> Deref for Page<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T] { self.0 }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Consecutive pages of `page_size` items; the last may be shorter.
#[derive(Debug)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    pub fn len(&self) -> usize { self.pages.len() }

    pub fn is_empty(&self) -> bool { self.pages.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = Page<'a, T>> + '_ {
        self.pages.iter().copied()
    }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = Page<'a, T>;
    type IntoIter = std::vec::IntoIter<Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter { self.pages.into_iter() }
}

pub fn paginate<T>(items: &[T], page_size: usize) -> Result<Paginator<'_, T>> {
    if page_size == 0 {
        return Err(Error::InvalidArgument("page size must be positive".into()));
    }
    Ok(Paginator { pages: items.chunks(page_size).map(Page).collect() })
}
