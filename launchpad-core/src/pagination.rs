use launchpad_shared::Launch;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Anything that carries an opaque, comparable position marker.
pub trait Cursored {
    fn cursor(&self) -> String;
}

impl Cursored for Launch {
    fn cursor(&self) -> String {
        Launch::cursor(self)
    }
}

/// A contiguous window over a result list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor of the last item in the page, `None` when the page is empty.
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Cuts a page out of `results`, which must already be in display order.
///
/// The page starts right after the first item whose cursor equals `after`.
/// A missing, empty or unknown `after` starts from the beginning of the list.
/// A `page_size` below one yields an empty page.
///
/// `has_more` is decided by comparing the page's last cursor with the last
/// cursor of the whole list, not by index arithmetic.
pub fn paginate<T: Cursored + Clone>(results: &[T], after: Option<&str>, page_size: i64) -> Page<T> {
    let items = window(results, after, page_size).to_vec();
    let cursor = items.last().map(Cursored::cursor);
    let has_more = match (&cursor, results.last()) {
        (Some(page_end), Some(list_end)) => *page_end != list_end.cursor(),
        _ => false,
    };

    Page { items, cursor, has_more }
}

fn window<'a, T: Cursored>(results: &'a [T], after: Option<&str>, page_size: i64) -> &'a [T] {
    if page_size < 1 {
        return &[];
    }
    let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);

    let start = match after.filter(|cursor| !cursor.is_empty()) {
        None => 0,
        Some(cursor) => results
            .iter()
            .position(|item| item.cursor() == cursor)
            .map_or(0, |index| index + 1),
    };
    let end = start.saturating_add(page_size).min(results.len());

    &results[start..end]
}
