//! Report page rendering - Full page and HTMX fragments
//!
//! Endpoints:
//! - page_report: Main report page with search, type filter and sort menu
//! - htmx_report_table: Summary, table and pagination (HTML fragment)
//! - htmx_report_reload: Reload from source, then the same fragment
//!
//! Helper functions:
//! - render_report: Summary cards, table and pagination for a snapshot
//! - render_pagination: First/prev/next/last buttons

use super::api::{parse_page_nav, parse_sort_key, parse_type_filter};
use crate::{ApiError, AppState};
use axum::extract::Query;
use axum::response::Html;
use serde::Deserialize;
use txreport_core::{PageControls, PageNav, ReportSnapshot, TypeFilter, SORT_OPTIONS};
use txreport_utils::{format_amount, format_number, sanitize_html};

/// Query parameters accepted by the table fragment, applied in field order
#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub nav: Option<String>,
}

/// Report page - Main page with controls and the report fragment
pub async fn page_report(state: axum::extract::State<AppState>) -> Html<String> {
    let snapshot = state.view.read().await.snapshot();
    let debounce_ms = state.config.search.debounce_ms;

    let type_options: String = [TypeFilter::All, TypeFilter::Debit, TypeFilter::Credit]
        .iter()
        .map(|filter| {
            let selected = if *filter == snapshot.type_filter { " selected" } else { "" };
            format!("<option value='{}'{}>{}</option>", filter.as_str(), selected, filter.as_str())
        })
        .collect();

    // the active key stays selectable even when it is not a menu entry
    let mut sort_options = String::new();
    if !SORT_OPTIONS.iter().any(|option| option.key == snapshot.active_sort) {
        sort_options.push_str(&format!(
            "<option value='{}' selected>{}</option>",
            snapshot.active_sort, snapshot.active_sort_label
        ));
    }
    for option in SORT_OPTIONS.iter() {
        let selected = if option.key == snapshot.active_sort { " selected" } else { "" };
        sort_options.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            option.key, selected, option.label
        ));
    }

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <div class='flex gap-2'>
                <button hx-post='/report/reload' hx-target='#report-content'
                    class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200' title='Reload transactions'>
                    Reload
                </button>
                <input type='text' name='q' placeholder='Search account name...' value='{}'
                    hx-get='/report/table' hx-target='#report-content' hx-trigger='keyup changed delay:{}ms'
                    class='px-4 py-2 border rounded-lg w-56'>
                <select name='type' hx-get='/report/table' hx-target='#report-content' hx-trigger='change'
                    class='px-4 py-2 border rounded-lg'>
                    {}
                </select>
                <select name='sort' hx-get='/report/table' hx-target='#report-content' hx-trigger='change'
                    class='px-4 py-2 border rounded-lg'>
                    {}
                </select>
            </div>
        </div>
        <div id='report-content' class='bg-white rounded-xl shadow-sm p-6'>
            {}
        </div>"#,
        sanitize_html(&snapshot.search_term),
        debounce_ms,
        type_options,
        sort_options,
        render_report(&snapshot)
    );

    Html(crate::base_html("Transactions", &inner_content))
}

/// HTMX: Report table - applies any given controls, then renders
pub async fn htmx_report_table(
    state: axum::extract::State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Html<String>, ApiError> {
    let type_filter = params.type_filter.as_deref().map(parse_type_filter).transpose()?;
    let sort = params.sort.as_deref().map(parse_sort_key).transpose()?;
    let nav = params.nav.as_deref().map(parse_page_nav).transpose()?;

    let mut view = state.view.write().await;
    if let Some(term) = params.q.as_deref() {
        // applied now; a term still pending from /api/search must not land later
        state.search.settle(term);
        view.set_search_term(term);
    }
    if let Some(type_filter) = type_filter {
        view.set_type_filter(type_filter);
    }
    if let Some(sort) = sort {
        view.set_sort_key(sort);
    }
    if let Some(page) = params.page {
        view.set_page(page);
    }
    if let Some(nav) = nav {
        view.navigate(nav);
    }

    Ok(Html(render_report(&view.snapshot())))
}

/// HTMX: Reload from the source and render the report fragment
pub async fn htmx_report_reload(state: axum::extract::State<AppState>) -> Html<String> {
    let snapshot = crate::reload(&state).await;
    Html(render_report(&snapshot))
}

/// Summary cards, table and pagination for one snapshot
pub fn render_report(snapshot: &ReportSnapshot) -> String {
    if snapshot.loading {
        return "<p class='text-gray-500 text-center'>Loading transactions...</p>".to_string();
    }
    if let Some(error) = &snapshot.error {
        return format!(
            "<div class='p-4 bg-red-50 text-red-700 rounded-lg border border-red-100'>{}</div>",
            sanitize_html(error)
        );
    }

    let summary = format!(
        r#"<div class='grid grid-cols-2 md:grid-cols-3 gap-3 mb-4'>
            <div class='bg-green-50 p-3 rounded-lg border border-green-100'><p class='text-xs text-green-600'>Total Credit</p><p class='text-xl font-bold'>{}</p></div>
            <div class='bg-red-50 p-3 rounded-lg border border-red-100'><p class='text-xs text-red-600'>Total Debit</p><p class='text-xl font-bold'>{}</p></div>
            <div class='bg-indigo-50 p-3 rounded-lg border border-indigo-100'><p class='text-xs text-indigo-600'>Matching</p><p class='text-xl font-bold'>{}</p></div>
        </div>"#,
        format_amount(snapshot.total_credit),
        format_amount(snapshot.total_debit),
        format_number(snapshot.filtered_count)
    );

    let rows = if snapshot.page_items.is_empty() {
        "<tr><td colspan='8' class='px-4 py-8 text-center text-gray-500'>No transactions found</td></tr>".to_string()
    } else {
        snapshot
            .page_items
            .iter()
            .map(|tx| {
                let amount_class = if tx.is_credit() { "text-green-600" } else { "text-red-600" };
                format!(
                    r#"<tr class='border-b hover:bg-gray-50'>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2 whitespace-nowrap'>{}</td>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2'>{}</td>
                        <td class='px-4 py-2 text-right font-mono {}'>{}</td>
                    </tr>"#,
                    tx.id,
                    tx.date_label(),
                    sanitize_html(&tx.voucher_no),
                    sanitize_html(&tx.account_id),
                    sanitize_html(&tx.account_name),
                    sanitize_html(&tx.branch),
                    tx.transaction_type,
                    amount_class,
                    format_amount(tx.amount)
                )
            })
            .collect()
    };

    let controls = PageControls::new(snapshot.filtered_count, snapshot.page_size, snapshot.page_index);

    format!(
        r#"{}
        <table class='w-full text-sm'>
            <thead>
                <tr class='text-left text-gray-500 border-b'>
                    <th class='px-4 py-2'>ID</th>
                    <th class='px-4 py-2'>Date</th>
                    <th class='px-4 py-2'>Voucher No</th>
                    <th class='px-4 py-2'>Account ID</th>
                    <th class='px-4 py-2'>Account Name</th>
                    <th class='px-4 py-2'>Branch</th>
                    <th class='px-4 py-2'>Type</th>
                    <th class='px-4 py-2 text-right'>Amount</th>
                </tr>
            </thead>
            <tbody>{}</tbody>
        </table>
        {}"#,
        summary,
        rows,
        render_pagination(&controls)
    )
}

/// First/prev/next/last buttons with the current position
pub fn render_pagination(controls: &PageControls) -> String {
    let button = |nav: PageNav, label: &str, enabled: bool| {
        if enabled {
            format!(
                "<button hx-get='/report/table?nav={}' hx-target='#report-content' class='px-3 py-1 border rounded hover:bg-gray-50'>{}</button>",
                urlencoding::encode(nav.as_str()),
                label
            )
        } else {
            format!("<button disabled class='px-3 py-1 border rounded text-gray-300'>{}</button>", label)
        }
    };

    format!(
        r#"<div class='flex items-center justify-between mt-4 text-sm'>
            <span class='text-gray-500'>Page {} of {} ({} items)</span>
            <div class='flex gap-1'>{}{}{}{}</div>
        </div>"#,
        format_number(controls.page_index + 1),
        format_number(controls.total_pages()),
        format_number(controls.length),
        button(PageNav::First, "First", controls.can_prev()),
        button(PageNav::Prev, "Prev", controls.can_prev()),
        button(PageNav::Next, "Next", controls.can_next()),
        button(PageNav::Last, "Last", controls.can_next())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_buttons() {
        let html = render_pagination(&PageControls::new(25, 10, 0));
        assert!(html.contains("Page 1 of 3 (25 items)"));
        assert!(html.contains("nav=next"));
        assert!(html.contains("nav=last"));
        assert!(!html.contains("nav=first"));
        assert!(!html.contains("nav=prev"));

        let html = render_pagination(&PageControls::new(25, 10, 2));
        assert!(html.contains("nav=first"));
        assert!(!html.contains("nav=next"));
    }

    #[test]
    fn test_pagination_empty() {
        let html = render_pagination(&PageControls::new(0, 10, 0));
        assert!(html.contains("Page 1 of 1 (0 items)"));
        assert!(!html.contains("hx-get"));
    }
}
