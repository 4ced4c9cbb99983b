//! Small generic helpers over slices used by the demonstration driver.

/// Apply `f` to every element.
pub fn map<T, U>(items: &[T], f: impl Fn(&T) -> U) -> Vec<U> {
    items.iter().map(f).collect()
}

/// Keep the elements matching `predicate`, preserving order.
pub fn filter<T: Clone>(items: &[T], predicate: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Fold the elements left to right starting from `initial`.
pub fn reduce<T, U>(items: &[T], initial: U, f: impl Fn(U, &T) -> U) -> U {
    items.iter().fold(initial, f)
}

/// Largest element, or `None` for an empty slice.
pub fn max<T: Ord + Copy>(items: &[T]) -> Option<T> {
    items.iter().copied().max()
}

/// Smallest element, or `None` for an empty slice.
pub fn min<T: Ord + Copy>(items: &[T]) -> Option<T> {
    items.iter().copied().min()
}

pub fn contains<T: PartialEq>(items: &[T], needle: &T) -> bool {
    items.iter().any(|item| item == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERS: [i64; 6] = [1, 2, 3, 5, 8, 9];

    #[test]
    fn map_filter_reduce() {
        assert_eq!(map(&NUMBERS, |n| n * 2), vec![2, 4, 6, 10, 16, 18]);
        assert_eq!(filter(&NUMBERS, |n| n % 2 == 0), vec![2, 8]);
        assert_eq!(reduce(&NUMBERS, 0, |acc, n| acc + n), 28);
    }

    #[test]
    fn extremes_of_empty_slice() {
        let empty: [i64; 0] = [];
        assert_eq!(max(&empty), None);
        assert_eq!(min(&empty), None);
        assert_eq!(max(&NUMBERS), Some(9));
        assert_eq!(min(&NUMBERS), Some(1));
    }

    #[test]
    fn contains_checks_membership() {
        assert!(contains(&NUMBERS, &5));
        assert!(!contains(&NUMBERS, &4));
    }
}
