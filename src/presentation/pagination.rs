use crate::utils::pagination::PageMeta;
use htmlescape::encode_minimal;
use std::fmt::Write;
use url::form_urlencoded;

const MAX_VISIBLE_PAGES: u32 = 5;

/// Page numbers shown as buttons: all pages when there are few, otherwise a
/// window of up to five starting two before the current page.
pub fn page_numbers(page: u32, total_pages: u32) -> Vec<u32> {
    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).collect();
    }
    let start = page.saturating_sub(2).max(1);
    let end = total_pages.min(start + MAX_VISIBLE_PAGES - 1);
    (start..=end).collect()
}

/// "Showing X to Y of Z transactions".
pub fn range_summary(meta: &PageMeta) -> String {
    let start = (meta.page as usize).saturating_sub(1) * meta.limit as usize + 1;
    let end = (meta.page as usize * meta.limit as usize).min(meta.total);
    format!("Showing {} to {} of {} transactions", start, end, meta.total)
}

/// Link to another page of the dashboard, preserving limit and query.
pub fn page_href(page: u32, limit: u32, query: Option<&str>) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    params.append_pair("p", &page.to_string());
    params.append_pair("limit", &limit.to_string());
    if let Some(q) = query {
        params.append_pair("q", q);
    }
    format!("/dashboard?{}", params.finish())
}

/// Previous / numbered / Next controls with the range summary above them.
pub fn render_pagination(meta: &PageMeta, query: Option<&str>) -> String {
    let total_pages = meta.total_pages.min(u32::MAX as usize) as u32;
    let mut html = String::from(r#"<div class="card pagination">"#);
    let _ = write!(
        html,
        r#"<div class="summary">{}</div><div class="controls">"#,
        encode_minimal(&range_summary(meta))
    );

    let button = |html: &mut String, label: &str, target: u32, enabled: bool, active: bool| {
        if !enabled {
            let _ = write!(html, r#"<span class="btn disabled">{}</span>"#, label);
        } else if active {
            let _ = write!(html, r#"<span class="btn active">{}</span>"#, label);
        } else {
            let _ = write!(
                html,
                r#"<a class="btn" href="{}">{}</a>"#,
                encode_minimal(&page_href(target, meta.limit, query)),
                label
            );
        }
    };

    button(
        &mut html,
        "Previous",
        meta.page.saturating_sub(1),
        meta.page > 1,
        false,
    );
    for number in page_numbers(meta.page, total_pages) {
        button(&mut html, &number.to_string(), number, true, number == meta.page);
    }
    button(
        &mut html,
        "Next",
        meta.page.saturating_add(1),
        meta.page < total_pages,
        false,
    );

    html.push_str("</div></div>");
    html
}
