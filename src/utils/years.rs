//! Volume year listing.
//!
//! A journal volume is all content of one year, so the list of volumes is
//! the set of distinct content years.

use std::collections::BTreeSet;

/// Deduplicate and sort (ascending) the years of all content items.
///
/// # Examples
///
/// ```
/// use paleoanthro::utils::content_years;
///
/// assert_eq!(content_years([2014, 2012, 2014, 2013]), vec![2012, 2013, 2014]);
/// ```
pub fn content_years<I>(years: I) -> Vec<i32>
where
    I: IntoIterator<Item = i32>,
{
    years.into_iter().collect::<BTreeSet<i32>>().into_iter().collect()
}

/// Most recent volume year, if there is any content at all.
pub fn latest_year<I>(years: I) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    years.into_iter().max()
}
